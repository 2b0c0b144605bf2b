use serde::{Deserialize, Serialize};

use crate::{Coordinate, Place, PlaceType, User};

/// Anything that can be drawn as a marker. The variant is fixed when the
/// value is built, never inferred from which fields happen to be present.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerItem {
    Place(Place),
    User(User),
}

/// Borrowed view of a [`MarkerItem`], used by render plans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerRef<'a> {
    Place(&'a Place),
    User(&'a User),
}

/// Identity of a marker. Places and users have independent id spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum MarkerKey {
    Place(i64),
    User(i64),
}

impl MarkerItem {
    pub fn as_marker_ref(&self) -> MarkerRef<'_> {
        match self {
            MarkerItem::Place(place) => MarkerRef::Place(place),
            MarkerItem::User(user) => MarkerRef::User(user),
        }
    }

    pub fn key(&self) -> MarkerKey {
        self.as_marker_ref().key()
    }
}

impl<'a> MarkerRef<'a> {
    pub fn id(&self) -> i64 {
        match self {
            MarkerRef::Place(place) => place.id,
            MarkerRef::User(user) => user.id,
        }
    }

    pub fn key(&self) -> MarkerKey {
        match self {
            MarkerRef::Place(place) => MarkerKey::Place(place.id),
            MarkerRef::User(user) => MarkerKey::User(user.id),
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            MarkerRef::Place(place) => &place.name,
            MarkerRef::User(user) => &user.name,
        }
    }

    pub fn coordinates(&self) -> Coordinate {
        match self {
            MarkerRef::Place(place) => place.coordinates,
            MarkerRef::User(user) => user.address.geo,
        }
    }

    pub fn place_type(&self) -> Option<PlaceType> {
        match self {
            MarkerRef::Place(place) => Some(place.place_type),
            MarkerRef::User(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_serialization() {
        let key: MarkerKey = serde_json::from_str(r#"{"kind": "place", "id": 2}"#).unwrap();
        assert_eq!(key, MarkerKey::Place(2));
        assert_eq!(
            serde_json::to_value(MarkerKey::User(5)).unwrap(),
            serde_json::json!({"kind": "user", "id": 5})
        );
    }

    #[test]
    fn test_same_id_different_kind() {
        let place = MarkerItem::Place(Place {
            id: 1,
            name: "Cafe".to_string(),
            place_type: PlaceType::Cafe,
            coordinates: Coordinate::new(48.46, 35.05),
        });

        assert_eq!(place.key(), MarkerKey::Place(1));
        assert_ne!(place.key(), MarkerKey::User(1));
        assert_eq!(place.as_marker_ref().place_type(), Some(PlaceType::Cafe));
    }
}
