use std::path::Path;

use anyhow::{bail, Result};
use geo_index::{backfill_user_geo, RandomSource};
use log::{info, warn};
use reconcile::classify_markers;
use serde_json::Value;
use types::{Handshake, MapConfig, MarkerItem, Place, User};
use util::read_json;

use crate::MapStore;

/// Reads a places document. Records that are not well-formed places are
/// skipped and logged instead of failing the whole load.
pub fn load_places<P: AsRef<Path>>(path: P) -> Result<Vec<Place>> {
    let path = path.as_ref();
    let values: Vec<Value> = read_json(path)?;
    let (items, _) = classify_markers(&values);

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            MarkerItem::Place(place) => Some(place),
            MarkerItem::User(user) => {
                warn!("{}: user {} in places document, skipped", path.display(), user.id);
                None
            }
        })
        .collect())
}

/// Reads a users document, skipping records that are not well-formed users.
pub fn load_users<P: AsRef<Path>>(path: P) -> Result<Vec<User>> {
    let path = path.as_ref();
    let values: Vec<Value> = read_json(path)?;
    let (items, _) = classify_markers(&values);

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            MarkerItem::User(user) => Some(user),
            MarkerItem::Place(place) => {
                warn!("{}: place {} in users document, skipped", path.display(), place.id);
                None
            }
        })
        .collect())
}

pub fn load_handshake<P: AsRef<Path>>(path: P) -> Result<Handshake> {
    read_json(path)
}

/// Loads everything `config` names into a fresh store. User coordinates are
/// replaced with synthesized ones when `backfillUserGeo` is set.
pub fn fetch_app_data<S: RandomSource + ?Sized>(
    config: &MapConfig,
    source: &mut S,
) -> Result<MapStore> {
    if config.places_path.is_none() && config.handshake_path.is_none() {
        bail!("config names neither placesPath nor handshakePath");
    }

    let mut users = load_users(&config.users_path)?;
    if config.backfill_user_geo {
        backfill_user_geo(&mut users, &config.synthetic_bounds, source);
    }

    let mut places = Vec::new();
    let mut initial_location = config.initial_location;
    if let Some(path) = &config.handshake_path {
        let handshake = load_handshake(path)?;
        initial_location = initial_location.or(Some(handshake.initial_location));
        places.extend(handshake.places);
    }
    if let Some(path) = &config.places_path {
        places.extend(load_places(path)?);
    }

    let mut store = MapStore::new(Vec::new(), users);
    store.set_nearest_count(config.nearest_count);
    for place in places {
        if let Err(e) = store.add_place(place) {
            warn!("{e}, keeping the first one");
        }
    }

    match initial_location {
        Some(location) => store.set_initial_location(location),
        None => warn!("no initial location configured, nearest users wait for a map center"),
    }

    info!(
        "loaded {} places and {} users",
        store.places().len(),
        store.users().len()
    );
    Ok(store)
}
