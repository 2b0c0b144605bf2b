use types::{Coordinate, User};

use crate::distance_between;

/// Up to `k` candidates ordered by ascending distance to `reference`.
/// Candidates at equal distance keep their input order.
pub fn nearest<T, I>(reference: Coordinate, candidates: I, k: usize) -> Vec<T>
where
    I: IntoIterator<Item = (T, Coordinate)>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(f64, T)> = candidates
        .into_iter()
        .map(|(candidate, coordinate)| (distance_between(reference, coordinate), candidate))
        .collect();

    // stable sort, ties stay in input order
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    ranked
        .into_iter()
        .take(k)
        .map(|(_, candidate)| candidate)
        .collect()
}

pub fn nearest_users(users: &[User], reference: Coordinate, k: usize) -> Vec<&User> {
    nearest(reference, users.iter().map(|user| (user, user.address.geo)), k)
}
