//! Small places and users for tests in the workspace crates.

use crate::{Address, Company, Coordinate, Place, PlaceType, User};

pub fn place(id: i64, place_type: PlaceType) -> Place {
    Place {
        id,
        name: format!("{place_type} {id}"),
        place_type,
        coordinates: Coordinate::new(48.46 + id as f64 * 0.001, 35.05),
    }
}

/// User `id` placed on a line north of the demo region's south edge.
pub fn user(id: i64) -> User {
    user_at(id, Coordinate::new(48.45 + id as f64 * 0.002, 35.06))
}

pub fn user_at(id: i64, geo: Coordinate) -> User {
    User {
        id,
        name: format!("user {id}"),
        username: format!("user{id}"),
        email: String::new(),
        phone: String::new(),
        website: String::new(),
        address: Address {
            street: String::new(),
            suite: String::new(),
            city: String::new(),
            zipcode: String::new(),
            geo,
        },
        company: Company::default(),
    }
}
