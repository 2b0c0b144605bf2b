//! Serde helpers for upstream documents that encode numbers as strings.

use serde::{de::Error, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

/// Accepts `12.5` as well as `"12.5"`. Use with `#[serde(deserialize_with)]`.
pub fn f64_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(value) => value
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid number {:?}", value))),
    }
}
