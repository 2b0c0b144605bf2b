mod classify;
mod icon;
mod plan;
mod render;

pub use classify::{classify_marker, classify_markers, MarkerError};
pub use geo_index::distance_label;
pub use icon::{icon_name, MarkerData, MarkerIcon};
pub use plan::{
    all_place_types, build_render_plan, filter_places, reconcile_selection, MarkerRenderPlan,
    PlaceTypeFilter, RenderEntry,
};
pub use render::{draw_plan, GeoJsonRenderer, MarkerRenderer};
