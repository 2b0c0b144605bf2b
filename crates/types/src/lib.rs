mod config;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
mod marker;

use std::{fmt, str::FromStr};

use geo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use util::lenient::f64_from_number_or_string;

pub use config::{Bounds, Handshake, MapConfig, DEFAULT_NEAREST_COUNT};
pub use marker::{MarkerItem, MarkerKey, MarkerRef};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub lat: f64,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        Point::new(coordinate.lng, coordinate.lat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Cafe,
    Restaurant,
    Park,
    Museum,
    Shop,
    Hotel,
}

impl PlaceType {
    pub const ALL: [PlaceType; 6] = [
        PlaceType::Cafe,
        PlaceType::Restaurant,
        PlaceType::Park,
        PlaceType::Museum,
        PlaceType::Shop,
        PlaceType::Hotel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceType::Cafe => "cafe",
            PlaceType::Restaurant => "restaurant",
            PlaceType::Park => "park",
            PlaceType::Museum => "museum",
            PlaceType::Shop => "shop",
            PlaceType::Hotel => "hotel",
        }
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown place type {0:?}")]
pub struct UnknownPlaceType(pub String);

impl FromStr for PlaceType {
    type Err = UnknownPlaceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PlaceType::ALL
            .into_iter()
            .find(|place_type| place_type.as_str() == wanted)
            .ok_or_else(|| UnknownPlaceType(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: PlaceType,
    /// Serialized as a `[lat, lng]` tuple.
    #[serde(with = "lat_lng_tuple")]
    pub coordinates: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
    pub geo: Coordinate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub catch_phrase: String,
    #[serde(default)]
    pub bs: String,
}

mod lat_lng_tuple {
    use super::*;

    pub fn serialize<S: Serializer>(
        coordinate: &Coordinate,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        (coordinate.lat, coordinate.lng).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Coordinate, D::Error> {
        let (lat, lng) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Coordinate { lat, lng })
    }
}
