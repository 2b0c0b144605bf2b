use log::debug;
use rand::{rngs::StdRng, rngs::ThreadRng, Rng, SeedableRng};
use types::{Bounds, Coordinate, User};

/// Six decimal places, roughly 0.11 m.
const PRECISION: f64 = 1_000_000.0;

/// Supplies uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

pub fn thread_source() -> RngSource<ThreadRng> {
    RngSource(rand::thread_rng())
}

pub fn seeded_source(seed: u64) -> RngSource<StdRng> {
    RngSource(StdRng::seed_from_u64(seed))
}

/// Replays a fixed list of values, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    position: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f64>) -> Self {
        FixedSequence {
            values,
            position: 0,
        }
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}

pub fn random_coordinate_in_bounds<S: RandomSource + ?Sized>(
    bounds: &Bounds,
    source: &mut S,
) -> Coordinate {
    let lat = sample_rounded(bounds.lat_min, bounds.lat_range, source.next_unit());
    let lng = sample_rounded(bounds.lng_min, bounds.lng_range, source.next_unit());
    Coordinate { lat, lng }
}

/// Rounds `min + unit * range` to six decimals while staying inside
/// `[min, min + range)`: rounding up onto the open end steps back one unit.
fn sample_rounded(min: f64, range: f64, unit: f64) -> f64 {
    let mut lowest = (min * PRECISION).round();
    if lowest / PRECISION < min {
        lowest += 1.0;
    }
    let highest = ((min + range) * PRECISION).round() - 1.0;

    let units = ((min + unit * range) * PRECISION)
        .round()
        .clamp(lowest, highest.max(lowest));
    units / PRECISION
}

/// Overwrites every user's `address.geo` with a coordinate synthesized
/// inside `bounds`. Upstream demo users live far outside the map region.
pub fn backfill_user_geo<S: RandomSource + ?Sized>(
    users: &mut [User],
    bounds: &Bounds,
    source: &mut S,
) {
    for user in users.iter_mut() {
        let geo = random_coordinate_in_bounds(bounds, source);
        debug!("user {} geo {:?} -> {:?}", user.id, user.address.geo, geo);
        user.address.geo = geo;
    }
}
