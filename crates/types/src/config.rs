use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Coordinate, Place};

pub const DEFAULT_NEAREST_COUNT: usize = 3;

/// Sampling region for synthesized coordinates:
/// `[lat_min, lat_min + lat_range) x [lng_min, lng_min + lng_range)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub lat_min: f64,
    pub lat_range: f64,
    pub lng_min: f64,
    pub lng_range: f64,
}

impl Bounds {
    /// Central Dnipro, where the demo places live.
    pub const DEMO_REGION: Bounds = Bounds {
        lat_min: 48.45,
        lat_range: 0.02,
        lng_min: 35.05,
        lng_range: 0.02,
    };

    pub fn lat_max(&self) -> f64 {
        self.lat_min + self.lat_range
    }

    pub fn lng_max(&self) -> f64 {
        self.lng_min + self.lng_range
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.lat_min..self.lat_max()).contains(&coordinate.lat)
            && (self.lng_min..self.lng_max()).contains(&coordinate.lng)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::DEMO_REGION
    }
}

/// Bootstrap document carrying the initial map location alongside places.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub initial_location: Coordinate,
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    #[serde(default)]
    pub places_path: Option<PathBuf>,
    pub users_path: PathBuf,
    #[serde(default)]
    pub handshake_path: Option<PathBuf>,
    #[serde(default)]
    pub initial_location: Option<Coordinate>,
    #[serde(default = "default_nearest_count")]
    pub nearest_count: usize,
    #[serde(default)]
    pub synthetic_bounds: Bounds,
    #[serde(default = "default_backfill_user_geo")]
    pub backfill_user_geo: bool,
}

fn default_nearest_count() -> usize {
    DEFAULT_NEAREST_COUNT
}

fn default_backfill_user_geo() -> bool {
    true
}
