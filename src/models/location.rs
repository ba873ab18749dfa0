use serde::{Deserialize, Serialize};

/// A city/regency from the remote location list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
}

impl Location {
    /// Case-insensitive substring match used by the picker and `locations QUERY`.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Picks the saved location if it still exists, otherwise the first one.
pub fn choose_initial<'a>(locations: &'a [Location], saved_id: Option<&str>) -> Option<&'a Location> {
    saved_id
        .and_then(|id| locations.iter().find(|l| l.id == id))
        .or_else(|| locations.first())
}
