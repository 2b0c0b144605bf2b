mod distance;
mod nearest;
mod random;

pub use distance::{distance_between, distance_label};
pub use nearest::{nearest, nearest_users};
pub use random::{
    backfill_user_geo, random_coordinate_in_bounds, seeded_source, thread_source, FixedSequence,
    RandomSource, RngSource,
};
pub use types::DEFAULT_NEAREST_COUNT as NEAREST_USERS;
