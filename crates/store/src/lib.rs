mod loader;
mod map_store;

pub use loader::{fetch_app_data, load_handshake, load_places, load_users};
pub use map_store::{AppFlags, MapStore, StoreError};
