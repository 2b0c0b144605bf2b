use std::sync::{Arc, RwLock};

use geo_index::thread_source;
use log::{error, info, warn};
use ntex::web;
use store::{AppFlags, MapStore, StoreError, fetch_app_data};
use types::{MapConfig, Place};

use crate::map_service::{
    DistanceQuery, NearestQuery, StateUpdate, apply_state_update, distance_response,
    nearest_response, plan_response, reload_store, state_response, store_error_status,
};

/// Shared by every worker. Locks are taken store first, then flags.
pub struct AppState {
    pub store: Arc<RwLock<MapStore>>,
    pub flags: Arc<RwLock<AppFlags>>,
    pub config: Option<MapConfig>,
}

fn state_unavailable() -> web::HttpResponse {
    error!("map state lock poisoned");
    web::HttpResponse::InternalServerError().body("map state unavailable")
}

fn store_error(e: StoreError) -> web::HttpResponse {
    web::HttpResponse::build(store_error_status(&e)).body(e.to_string())
}

#[web::get("/places")]
pub async fn list_places(state: web::types::State<AppState>) -> web::HttpResponse {
    match state.store.read() {
        Ok(store) => web::HttpResponse::Ok().json(&store.places()),
        Err(_) => state_unavailable(),
    }
}

#[web::post("/places")]
pub async fn add_place(
    place: web::types::Json<Place>,
    state: web::types::State<AppState>,
) -> web::HttpResponse {
    let place = place.into_inner();
    let Ok(mut store) = state.store.write() else {
        return state_unavailable();
    };
    let id = place.id;
    match store.add_place(place) {
        Ok(()) => {
            info!("added place {}", id);
            web::HttpResponse::Created().finish()
        }
        Err(e) => store_error(e),
    }
}

#[web::get("/users")]
pub async fn list_users(state: web::types::State<AppState>) -> web::HttpResponse {
    match state.store.read() {
        Ok(store) => web::HttpResponse::Ok().json(&store.users()),
        Err(_) => state_unavailable(),
    }
}

#[web::get("/nearest")]
pub async fn nearest(
    query: web::types::Query<NearestQuery>,
    state: web::types::State<AppState>,
) -> web::HttpResponse {
    match state.store.read() {
        Ok(store) => web::HttpResponse::Ok().json(&nearest_response(&store, &query)),
        Err(_) => state_unavailable(),
    }
}

#[web::get("/state")]
pub async fn get_state(state: web::types::State<AppState>) -> web::HttpResponse {
    let (Ok(store), Ok(flags)) = (state.store.read(), state.flags.read()) else {
        return state_unavailable();
    };
    web::HttpResponse::Ok().json(&state_response(&store, &flags, false))
}

#[web::patch("/state")]
pub async fn update_state(
    update: web::types::Json<StateUpdate>,
    state: web::types::State<AppState>,
) -> web::HttpResponse {
    let (Ok(mut store), Ok(mut flags)) = (state.store.write(), state.flags.write()) else {
        return state_unavailable();
    };
    match apply_state_update(&mut store, &mut flags, update.into_inner()) {
        Ok(response) => web::HttpResponse::Ok().json(&response),
        Err(e) => store_error(e),
    }
}

#[web::get("/plan")]
pub async fn plan(state: web::types::State<AppState>) -> web::HttpResponse {
    match state.store.read() {
        Ok(store) => web::HttpResponse::Ok().json(&plan_response(&store)),
        Err(_) => state_unavailable(),
    }
}

#[web::get("/distance")]
pub async fn distance(query: web::types::Query<DistanceQuery>) -> web::HttpResponse {
    web::HttpResponse::Ok().json(&distance_response(&query))
}

#[web::post("/reload")]
pub async fn reload(state: web::types::State<AppState>) -> web::HttpResponse {
    let Some(config) = &state.config else {
        return web::HttpResponse::BadRequest().body("server started without a config");
    };
    match state.flags.write() {
        Ok(mut flags) => flags.show_loader = true,
        Err(_) => return state_unavailable(),
    }

    let fresh = fetch_app_data(config, &mut thread_source());

    let (Ok(mut store), Ok(mut flags)) = (state.store.write(), state.flags.write()) else {
        return state_unavailable();
    };
    let fresh = match fresh {
        Ok(fresh) => fresh,
        Err(e) => {
            warn!("reload failed: {e:#}");
            flags.show_loader = false;
            return web::HttpResponse::BadGateway().body(format!("{e:#}"));
        }
    };
    let response = reload_store(&mut store, &mut flags, fresh);
    info!(
        "reloaded {} places and {} users",
        store.places().len(),
        store.users().len()
    );
    web::HttpResponse::Ok().json(&response)
}
