use log::warn;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use types::{MarkerItem, Place, User};

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("unclassifiable marker {id}: {reason}")]
    Unclassifiable { id: String, reason: &'static str },
    #[error("malformed {kind} marker {id}: {source}")]
    Malformed {
        kind: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Builds a [`MarkerItem`] from an upstream record. A record with
/// `coordinates` is a place, one with `address` is a user. Anything else,
/// including records carrying both, is rejected.
pub fn classify_marker(value: &Value) -> Result<MarkerItem, MarkerError> {
    let id = value
        .get("id")
        .map_or_else(|| "<no id>".to_string(), Value::to_string);

    let Some(record) = value.as_object() else {
        return Err(MarkerError::Unclassifiable {
            id,
            reason: "not an object",
        });
    };

    match (record.contains_key("coordinates"), record.contains_key("address")) {
        (true, false) => Place::deserialize(value)
            .map(MarkerItem::Place)
            .map_err(|source| MarkerError::Malformed {
                kind: "place",
                id,
                source,
            }),
        (false, true) => User::deserialize(value)
            .map(MarkerItem::User)
            .map_err(|source| MarkerError::Malformed {
                kind: "user",
                id,
                source,
            }),
        (true, true) => Err(MarkerError::Unclassifiable {
            id,
            reason: "has both coordinates and address",
        }),
        (false, false) => Err(MarkerError::Unclassifiable {
            id,
            reason: "has neither coordinates nor address",
        }),
    }
}

/// Classifies every record, skipping and reporting the ones that fail.
pub fn classify_markers(values: &[Value]) -> (Vec<MarkerItem>, Vec<MarkerError>) {
    let mut items = Vec::with_capacity(values.len());
    let mut errors = Vec::new();

    for value in values {
        match classify_marker(value) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!("skipping marker: {e}");
                errors.push(e);
            }
        }
    }

    (items, errors)
}
