use geo_index::nearest_users;
use log::info;
use reconcile::{
    all_place_types, build_render_plan, filter_places, reconcile_selection, MarkerRenderPlan,
    PlaceTypeFilter,
};
use thiserror::Error;
use types::{Coordinate, MarkerItem, MarkerKey, Place, PlaceType, User, DEFAULT_NEAREST_COUNT};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("place {0} already exists")]
    DuplicatePlace(i64),
    #[error("no marker {0:?}")]
    UnknownMarker(MarkerKey),
}

/// Host flags that live next to the map state. The loader shows while data
/// is being fetched, the drawer is the place details panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppFlags {
    pub show_loader: bool,
    pub show_drawer: bool,
}

impl Default for AppFlags {
    fn default() -> Self {
        AppFlags {
            show_loader: true,
            show_drawer: false,
        }
    }
}

/// Map state owned by the host. Every change that can hide the selected
/// place runs the selection reconciliation before returning.
#[derive(Debug, Clone)]
pub struct MapStore {
    places: Vec<Place>,
    users: Vec<User>,
    place_type_filter: PlaceTypeFilter,
    initial_location: Option<Coordinate>,
    map_center: Option<Coordinate>,
    show_all_users: bool,
    selected: Option<MarkerItem>,
    nearest_count: usize,
}

impl Default for MapStore {
    fn default() -> Self {
        MapStore {
            places: Vec::new(),
            users: Vec::new(),
            place_type_filter: all_place_types(),
            initial_location: None,
            map_center: None,
            show_all_users: false,
            selected: None,
            nearest_count: DEFAULT_NEAREST_COUNT,
        }
    }
}

impl MapStore {
    pub fn new(places: Vec<Place>, users: Vec<User>) -> Self {
        MapStore {
            places,
            users,
            ..Default::default()
        }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn place_type_filter(&self) -> &PlaceTypeFilter {
        &self.place_type_filter
    }

    pub fn initial_location(&self) -> Option<Coordinate> {
        self.initial_location
    }

    pub fn map_center(&self) -> Option<Coordinate> {
        self.map_center
    }

    pub fn show_all_users(&self) -> bool {
        self.show_all_users
    }

    pub fn selected(&self) -> Option<&MarkerItem> {
        self.selected.as_ref()
    }

    pub fn nearest_count(&self) -> usize {
        self.nearest_count
    }

    /// True once places and users are present and the initial location is
    /// known (a zero latitude or longitude counts as unknown).
    pub fn is_data_loaded(&self) -> bool {
        !self.places.is_empty()
            && !self.users.is_empty()
            && self
                .initial_location
                .is_some_and(|location| location.lat != 0.0 && location.lng != 0.0)
    }

    pub fn set_initial_location(&mut self, location: Coordinate) {
        self.initial_location = Some(location);
    }

    pub fn set_map_center(&mut self, center: Option<Coordinate>) {
        self.map_center = center;
    }

    pub fn set_nearest_count(&mut self, nearest_count: usize) {
        self.nearest_count = nearest_count;
    }

    pub fn set_show_all_users(&mut self, show_all_users: bool) {
        self.show_all_users = show_all_users;
    }

    /// Swaps in freshly fetched data. Returns whether the selection was cleared.
    pub fn replace_data(&mut self, places: Vec<Place>, users: Vec<User>) -> bool {
        self.places = places;
        self.users = users;
        self.reconcile()
    }

    pub fn add_place(&mut self, place: Place) -> Result<(), StoreError> {
        if self.places.iter().any(|existing| existing.id == place.id) {
            return Err(StoreError::DuplicatePlace(place.id));
        }
        self.places.push(place);
        Ok(())
    }

    /// Returns whether the selection was cleared.
    pub fn set_place_type_filter(&mut self, filter: PlaceTypeFilter) -> bool {
        self.place_type_filter = filter;
        self.reconcile()
    }

    /// Flips one type in the filter. Returns whether the selection was cleared.
    pub fn toggle_place_type(&mut self, place_type: PlaceType) -> bool {
        if !self.place_type_filter.remove(&place_type) {
            self.place_type_filter.insert(place_type);
        }
        self.reconcile()
    }

    pub fn reset_place_type_filter(&mut self) {
        self.place_type_filter = all_place_types();
    }

    /// Selects the marker behind `key`. Returns whether the selection was
    /// cleared right away because the filter hides that place.
    pub fn select_marker(&mut self, key: MarkerKey) -> Result<bool, StoreError> {
        let item = match key {
            MarkerKey::Place(id) => self
                .places
                .iter()
                .find(|place| place.id == id)
                .map(|place| MarkerItem::Place(place.clone())),
            MarkerKey::User(id) => self
                .users
                .iter()
                .find(|user| user.id == id)
                .map(|user| MarkerItem::User(user.clone())),
        }
        .ok_or(StoreError::UnknownMarker(key))?;

        self.selected = Some(item);
        Ok(self.reconcile())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Map center when the map reported one, else the initial location.
    pub fn reference_point(&self) -> Option<Coordinate> {
        self.map_center.or(self.initial_location)
    }

    pub fn nearest_users(&self) -> Vec<&User> {
        match self.reference_point() {
            Some(reference) => nearest_users(&self.users, reference, self.nearest_count),
            None => Vec::new(),
        }
    }

    pub fn filtered_places(&self) -> Vec<&Place> {
        filter_places(&self.places, &self.place_type_filter)
    }

    /// Clears the selection if the filter hides the selected place.
    fn reconcile(&mut self) -> bool {
        let stale = reconcile_selection(&self.filtered_places(), self.selected.as_ref());
        if stale {
            if let Some(selected) = self.selected.take() {
                info!("cleared selection {:?}, place no longer shown", selected.key());
            }
        }
        stale
    }

    pub fn render_plan(&self) -> MarkerRenderPlan<'_> {
        let filtered_places = self.filtered_places();
        let nearest_users = self.nearest_users();
        build_render_plan(
            &filtered_places,
            &self.users,
            &nearest_users,
            self.show_all_users,
            self.selected.as_ref(),
        )
    }
}
