mod map_endpoint;
mod map_service;

use anyhow::{Ok, Result};
use log::info;
use map_endpoint::AppState;
use map_endpoint::{
    add_place, distance, get_state, list_places, list_users, nearest, plan, reload, update_state,
};
use ntex::web;
use std::sync::{Arc, RwLock};
use store::{AppFlags, MapStore};
use types::MapConfig;

pub use map_service::{DistanceResponse, PlanResponse, StateResponse, StateUpdate};

/// Serves `store`, which the caller has already loaded. `config` enables
/// `POST /reload`.
pub async fn run_api(
    store: MapStore,
    config: Option<MapConfig>,
    port: u16,
    workers: usize,
) -> Result<()> {
    info!("Starting webserver on port {}", port);
    let store = Arc::new(RwLock::new(store));
    let flags = Arc::new(RwLock::new(AppFlags {
        show_loader: false,
        ..AppFlags::default()
    }));

    web::HttpServer::new(move || {
        web::App::new()
            .state(AppState {
                store: store.clone(),
                flags: flags.clone(),
                config: config.clone(),
            })
            .service(list_places)
            .service(add_place)
            .service(list_users)
            .service(nearest)
            .service(get_state)
            .service(update_state)
            .service(plan)
            .service(distance)
            .service(reload)
    })
    .workers(workers)
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}
