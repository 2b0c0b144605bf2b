use geo_index::{distance_between, distance_label};
use ntex::http::StatusCode;
use reconcile::{MarkerData, PlaceTypeFilter};
use serde::{Deserialize, Deserializer, Serialize};
use store::{AppFlags, MapStore, StoreError};
use types::{Coordinate, MarkerItem, MarkerKey, PlaceType, User};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    #[serde(default)]
    pub types: Option<Vec<PlaceType>>,
    #[serde(default)]
    pub reset_filter: bool,
    #[serde(default)]
    pub show_all_users: Option<bool>,
    #[serde(default)]
    pub show_drawer: Option<bool>,
    #[serde(default)]
    pub map_center: Option<Coordinate>,
    /// Absent leaves the selection alone, `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub selected: Option<Option<MarkerKey>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub cleared_selection: bool,
    pub filter: Vec<PlaceType>,
    pub show_all_users: bool,
    pub map_center: Option<Coordinate>,
    pub selected: Option<MarkerKey>,
    pub data_loaded: bool,
    pub show_loader: bool,
    pub show_drawer: bool,
}

#[derive(Serialize, Debug)]
pub struct PlanResponse {
    pub markers: Vec<MarkerData>,
}

#[derive(Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lng: f64,
    pub k: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceQuery {
    pub from_lat: f64,
    pub from_lng: f64,
    pub to_lat: f64,
    pub to_lng: f64,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct DistanceResponse {
    pub meters: f64,
    pub label: String,
}

pub fn state_response(
    store: &MapStore,
    flags: &AppFlags,
    cleared_selection: bool,
) -> StateResponse {
    StateResponse {
        cleared_selection,
        filter: store.place_type_filter().iter().copied().collect(),
        show_all_users: store.show_all_users(),
        map_center: store.map_center(),
        selected: store.selected().map(MarkerItem::key),
        data_loaded: store.is_data_loaded(),
        show_loader: flags.show_loader,
        show_drawer: flags.show_drawer,
    }
}

pub fn store_error_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::DuplicatePlace(_) => StatusCode::CONFLICT,
        StoreError::UnknownMarker(_) => StatusCode::NOT_FOUND,
    }
}

/// Applies the filter first so a selection made in the same request is
/// checked against the new filter.
pub fn apply_state_update(
    store: &mut MapStore,
    flags: &mut AppFlags,
    update: StateUpdate,
) -> Result<StateResponse, StoreError> {
    let mut cleared_selection = false;

    if update.reset_filter {
        store.reset_place_type_filter();
    } else if let Some(types) = update.types {
        let filter: PlaceTypeFilter = types.into_iter().collect();
        cleared_selection |= store.set_place_type_filter(filter);
    }
    if let Some(show_all_users) = update.show_all_users {
        store.set_show_all_users(show_all_users);
    }
    if let Some(show_drawer) = update.show_drawer {
        flags.show_drawer = show_drawer;
    }
    if update.map_center.is_some() {
        store.set_map_center(update.map_center);
    }
    match update.selected {
        Some(Some(key)) => cleared_selection |= store.select_marker(key)?,
        Some(None) => store.clear_selection(),
        None => {}
    }

    Ok(state_response(store, flags, cleared_selection))
}

/// Swaps freshly fetched data into the served store. Filter, toggle, map
/// center and selection survive unless the selected place is gone.
pub fn reload_store(store: &mut MapStore, flags: &mut AppFlags, fresh: MapStore) -> StateResponse {
    let cleared_selection = store.replace_data(fresh.places().to_vec(), fresh.users().to_vec());
    if let Some(location) = fresh.initial_location() {
        store.set_initial_location(location);
    }
    store.set_nearest_count(fresh.nearest_count());
    flags.show_loader = false;

    state_response(store, flags, cleared_selection)
}

pub fn plan_response(store: &MapStore) -> PlanResponse {
    let markers = store
        .render_plan()
        .entries()
        .iter()
        .map(MarkerData::from_entry)
        .collect();

    PlanResponse { markers }
}

pub fn nearest_response(store: &MapStore, query: &NearestQuery) -> Vec<User> {
    let reference = Coordinate::new(query.lat, query.lng);
    let k = query.k.unwrap_or(store.nearest_count());
    geo_index::nearest_users(store.users(), reference, k)
        .into_iter()
        .cloned()
        .collect()
}

pub fn distance_response(query: &DistanceQuery) -> DistanceResponse {
    let from = Coordinate::new(query.from_lat, query.from_lng);
    let to = Coordinate::new(query.to_lat, query.to_lng);
    DistanceResponse {
        meters: distance_between(from, to),
        label: distance_label(from, to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::fixtures::{place, user_at};

    fn user(id: i64, lat: f64) -> User {
        user_at(id, Coordinate::new(lat, 35.06))
    }

    fn store() -> MapStore {
        let mut store = MapStore::new(
            vec![place(1, PlaceType::Cafe), place(2, PlaceType::Park)],
            vec![user(1, 48.451), user(2, 48.452), user(3, 48.469), user(4, 48.453)],
        );
        store.set_initial_location(Coordinate::new(48.45, 35.06));
        store
    }

    fn loaded() -> AppFlags {
        AppFlags {
            show_loader: false,
            ..AppFlags::default()
        }
    }

    fn update(store: &mut MapStore, update: StateUpdate) -> Result<StateResponse, StoreError> {
        apply_state_update(store, &mut loaded(), update)
    }

    fn nearest_ids(store: &MapStore) -> Vec<i64> {
        store.nearest_users().iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_update_parses_selected_states() {
        let absent: StateUpdate = serde_json::from_str(r#"{"showAllUsers": true}"#).unwrap();
        let cleared: StateUpdate = serde_json::from_str(r#"{"selected": null}"#).unwrap();
        let json = r#"{"selected": {"kind": "place", "id": 2}, "types": ["park"]}"#;
        let chosen: StateUpdate = serde_json::from_str(json).unwrap();

        assert_eq!(absent.selected, None);
        assert_eq!(cleared.selected, Some(None));
        assert_eq!(chosen.selected, Some(Some(MarkerKey::Place(2))));
        assert_eq!(chosen.types, Some(vec![PlaceType::Park]));
    }

    #[test]
    fn test_filter_update_clears_selection() {
        let mut store = store();
        store.select_marker(MarkerKey::Place(1)).unwrap();

        let response = update(
            &mut store,
            StateUpdate {
                types: Some(vec![PlaceType::Park]),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(response.cleared_selection);
        assert_eq!(response.selected, None);
        assert_eq!(response.filter, vec![PlaceType::Park]);
        assert!(response.data_loaded);
    }

    #[test]
    fn test_selecting_hidden_place_is_cleared() {
        let mut store = store();
        store.set_place_type_filter([PlaceType::Park].into_iter().collect());

        let response = update(
            &mut store,
            StateUpdate {
                selected: Some(Some(MarkerKey::Place(1))),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(response.cleared_selection);
        assert_eq!(response.selected, None);
    }

    #[test]
    fn test_reset_filter_wins_over_types() {
        let mut store = store();
        store.set_place_type_filter([PlaceType::Park].into_iter().collect());

        let response = update(
            &mut store,
            StateUpdate {
                reset_filter: true,
                types: Some(vec![PlaceType::Cafe]),
                selected: Some(Some(MarkerKey::Place(1))),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(response.filter, PlaceType::ALL.to_vec());
        assert!(!response.cleared_selection);
        assert_eq!(response.selected, Some(MarkerKey::Place(1)));
    }

    #[test]
    fn test_map_center_moves_nearest_users() {
        let mut store = store();
        assert_eq!(nearest_ids(&store), vec![1, 2, 4]);

        let response = update(
            &mut store,
            StateUpdate {
                map_center: Some(Coordinate::new(48.47, 35.06)),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(response.map_center, Some(Coordinate::new(48.47, 35.06)));
        assert_eq!(nearest_ids(&store), vec![3, 4, 2]);

        // omitted center leaves the current one
        update(&mut store, StateUpdate::default()).unwrap();
        assert_eq!(store.map_center(), Some(Coordinate::new(48.47, 35.06)));
    }

    #[test]
    fn test_drawer_flag() {
        let mut store = store();
        let mut flags = loaded();
        let changes = serde_json::from_str(r#"{"showDrawer": true}"#).unwrap();

        let response = apply_state_update(&mut store, &mut flags, changes).unwrap();

        assert!(flags.show_drawer);
        assert!(response.show_drawer);
        assert!(!response.show_loader);
    }

    #[test]
    fn test_unknown_selection_is_an_error() {
        let mut store = store();
        let result = update(
            &mut store,
            StateUpdate {
                selected: Some(Some(MarkerKey::User(99))),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(StoreError::UnknownMarker(MarkerKey::User(99))));
    }

    #[test]
    fn test_store_error_status() {
        let duplicate = store().add_place(place(2, PlaceType::Shop)).unwrap_err();
        let unknown = store().select_marker(MarkerKey::Place(9)).unwrap_err();

        assert_eq!(store_error_status(&duplicate), StatusCode::CONFLICT);
        assert_eq!(store_error_status(&unknown), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_reload_clears_vanished_place() {
        let mut store = store();
        store.set_show_all_users(true);
        store.select_marker(MarkerKey::Place(1)).unwrap();
        let mut flags = AppFlags::default();

        let mut fresh = MapStore::new(vec![place(2, PlaceType::Park)], vec![user(5, 48.46)]);
        fresh.set_initial_location(Coordinate::new(48.46, 35.05));
        fresh.set_nearest_count(1);

        let response = reload_store(&mut store, &mut flags, fresh);

        assert!(response.cleared_selection);
        assert_eq!(response.selected, None);
        assert!(response.show_all_users);
        assert!(!response.show_loader);
        assert!(!flags.show_loader);
        assert_eq!(store.places().len(), 1);
        assert_eq!(store.initial_location(), Some(Coordinate::new(48.46, 35.05)));
        assert_eq!(store.nearest_count(), 1);
        assert_eq!(nearest_ids(&store), vec![5]);
    }

    #[test]
    fn test_reload_keeps_surviving_selection() {
        let mut store = store();
        store.select_marker(MarkerKey::Place(2)).unwrap();

        let fresh = MapStore::new(vec![place(2, PlaceType::Park)], Vec::new());
        let response = reload_store(&mut store, &mut loaded(), fresh);

        assert!(!response.cleared_selection);
        assert_eq!(response.selected, Some(MarkerKey::Place(2)));
        // no location in the fresh data, the old one stays
        assert_eq!(store.initial_location(), Some(Coordinate::new(48.45, 35.06)));
    }

    #[test]
    fn test_plan_response() {
        let mut store = store();
        store.select_marker(MarkerKey::User(3)).unwrap();

        let plan = plan_response(&store);
        let keys: Vec<(MarkerKey, bool)> = plan.markers.iter().map(|m| (m.key, m.active)).collect();

        assert_eq!(
            keys,
            vec![
                (MarkerKey::Place(1), false),
                (MarkerKey::Place(2), false),
                (MarkerKey::User(1), true),
                (MarkerKey::User(2), true),
                (MarkerKey::User(4), true),
            ]
        );
    }

    #[test]
    fn test_nearest_response() {
        let store = store();
        let ids = |k: Option<usize>| -> Vec<i64> {
            nearest_response(&store, &NearestQuery { lat: 48.47, lng: 35.06, k })
                .iter()
                .map(|u| u.id)
                .collect()
        };

        assert_eq!(ids(Some(1)), vec![3]);
        assert_eq!(ids(None), vec![3, 4, 2]);
    }

    #[test]
    fn test_distance_response() {
        let response = distance_response(&DistanceQuery {
            from_lat: 48.4647,
            from_lng: 35.0462,
            to_lat: 48.4750,
            to_lng: 35.0600,
        });

        assert_eq!(response.label, "1.5 km");
        assert!((response.meters - 1531.9).abs() < 1.0);
    }
}
