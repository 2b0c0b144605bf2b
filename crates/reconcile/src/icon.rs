use serde::Serialize;
use types::{MarkerKey, MarkerRef};

use crate::RenderEntry;

const ICON_DIR: &str = "/img";
const SHADOW_URL: &str = "/img/marker-shadow.png";

/// `marker-person` for users, `marker-{type}` for places, with an
/// `-active` suffix for the highlighted variant.
pub fn icon_name(item: MarkerRef<'_>, active: bool) -> String {
    let base = match item {
        MarkerRef::User(_) => "marker-person".to_string(),
        MarkerRef::Place(place) => format!("marker-{}", place.place_type),
    };
    if active {
        format!("{base}-active")
    } else {
        base
    }
}

/// Icon options in the shape the map widget expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub icon_url: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_url: String,
    pub shadow_size: [u32; 2],
    pub shadow_anchor: [i32; 2],
}

impl MarkerIcon {
    pub fn for_marker(item: MarkerRef<'_>, active: bool) -> Self {
        MarkerIcon {
            icon_url: format!("{ICON_DIR}/{}.png", icon_name(item, active)),
            icon_size: [32, 32],
            icon_anchor: [16, 32],
            popup_anchor: [0, -32],
            shadow_url: SHADOW_URL.to_string(),
            shadow_size: [41, 41],
            shadow_anchor: [13, 41],
        }
    }
}

/// Everything the rendering side needs to draw one marker. `key` comes back
/// with click events so the host can update its selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerData {
    pub key: MarkerKey,
    /// `"user"` or the place type.
    #[serde(rename = "type")]
    pub marker_type: String,
    pub name: String,
    /// `[lat, lng]`
    pub coordinates: [f64; 2],
    pub active: bool,
    pub icon: MarkerIcon,
}

impl MarkerData {
    pub fn from_entry(entry: &RenderEntry<'_>) -> Self {
        let item = entry.item;
        let coordinates = item.coordinates();
        MarkerData {
            key: item.key(),
            marker_type: item
                .place_type()
                .map_or_else(|| "user".to_string(), |place_type| place_type.to_string()),
            name: item.name().to_string(),
            coordinates: [coordinates.lat, coordinates.lng],
            active: entry.is_active,
            icon: MarkerIcon::for_marker(item, entry.is_active),
        }
    }
}
