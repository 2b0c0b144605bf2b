use geo::{Distance, Haversine, Point};
use types::Coordinate;

/// Great-circle distance in meters.
pub fn distance_between(a: Coordinate, b: Coordinate) -> f64 {
    Haversine::distance(Point::from(a), Point::from(b))
}

/// Distance rendered in kilometers with one decimal, e.g. `"3.4 km"`.
pub fn distance_label(origin: Coordinate, target: Coordinate) -> String {
    format!("{:.1} km", distance_between(origin, target) / 1000.0)
}
