use std::collections::{BTreeSet, HashSet};

use types::{MarkerItem, MarkerKey, MarkerRef, Place, PlaceType, User};

pub type PlaceTypeFilter = BTreeSet<PlaceType>;

pub fn all_place_types() -> PlaceTypeFilter {
    PlaceType::ALL.into_iter().collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEntry<'a> {
    pub item: MarkerRef<'a>,
    pub is_active: bool,
}

/// Markers to draw in one pass. Places come first, then users.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerRenderPlan<'a> {
    entries: Vec<RenderEntry<'a>>,
}

impl<'a> MarkerRenderPlan<'a> {
    pub fn entries(&self) -> &[RenderEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = MarkerKey> + '_ {
        self.entries.iter().map(|entry| entry.item.key())
    }

    pub fn entry(&self, key: MarkerKey) -> Option<&RenderEntry<'a>> {
        self.entries.iter().find(|entry| entry.item.key() == key)
    }
}

/// Places whose type is in `filter`, in input order.
pub fn filter_places<'a, I>(places: I, filter: &PlaceTypeFilter) -> Vec<&'a Place>
where
    I: IntoIterator<Item = &'a Place>,
{
    places
        .into_iter()
        .filter(|place| filter.contains(&place.place_type))
        .collect()
}

/// Whether the selection points at a place the filter no longer shows.
/// User selections are never invalidated here.
pub fn reconcile_selection(filtered_places: &[&Place], selected: Option<&MarkerItem>) -> bool {
    match selected {
        Some(MarkerItem::Place(selected_place)) => !filtered_places
            .iter()
            .any(|place| place.id == selected_place.id),
        Some(MarkerItem::User(_)) | None => false,
    }
}

pub fn build_render_plan<'a>(
    filtered_places: &[&'a Place],
    users: &'a [User],
    nearest_users: &[&'a User],
    show_all_users: bool,
    selected: Option<&MarkerItem>,
) -> MarkerRenderPlan<'a> {
    let selected_place_id = match selected {
        Some(MarkerItem::Place(place)) => Some(place.id),
        _ => None,
    };

    let mut entries: Vec<RenderEntry<'a>> = filtered_places
        .iter()
        .map(|place| RenderEntry {
            item: MarkerRef::Place(place),
            is_active: selected_place_id == Some(place.id),
        })
        .collect();

    if show_all_users {
        let nearest_ids: HashSet<i64> = nearest_users.iter().map(|user| user.id).collect();
        entries.extend(users.iter().map(|user| RenderEntry {
            item: MarkerRef::User(user),
            is_active: nearest_ids.contains(&user.id),
        }));
    } else {
        // every user shown here is a nearest one
        entries.extend(nearest_users.iter().map(|user| RenderEntry {
            item: MarkerRef::User(user),
            is_active: true,
        }));
    }

    MarkerRenderPlan { entries }
}
