use geojson::{feature::Id, Feature, FeatureCollection, Geometry, Value};
use types::MarkerKey;

use crate::{MarkerData, MarkerRenderPlan};

/// Drawing side of the map. Click events travel back to the host as the
/// `key` of the clicked [`MarkerData`].
pub trait MarkerRenderer {
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: MarkerData);
}

/// Replaces whatever the renderer shows with the markers of `plan`.
pub fn draw_plan<R: MarkerRenderer + ?Sized>(renderer: &mut R, plan: &MarkerRenderPlan<'_>) {
    renderer.clear_markers();
    for entry in plan.entries() {
        renderer.add_marker(MarkerData::from_entry(entry));
    }
}

/// Renders markers as GeoJSON point features.
#[derive(Debug, Default)]
pub struct GeoJsonRenderer {
    features: Vec<Feature>,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_feature_collection(self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.features,
            foreign_members: None,
        }
    }
}

impl MarkerRenderer for GeoJsonRenderer {
    fn clear_markers(&mut self) {
        self.features.clear();
    }

    fn add_marker(&mut self, marker: MarkerData) {
        let [lat, lng] = marker.coordinates;
        let geometry = Geometry::new(Value::Point(vec![lng, lat]));
        let id = match marker.key {
            MarkerKey::Place(id) => format!("place-{id}"),
            MarkerKey::User(id) => format!("user-{id}"),
        };
        let properties = match serde_json::to_value(&marker) {
            Ok(serde_json::Value::Object(properties)) => Some(properties),
            _ => None,
        };

        self.features.push(Feature {
            bbox: None,
            geometry: Some(geometry),
            id: Some(Id::String(id)),
            properties,
            foreign_members: None,
        });
    }
}
