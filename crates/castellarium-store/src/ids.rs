use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The visited and wishlisted castle ids.
///
/// The two sets are always disjoint: visiting an id removes it from the
/// wishlist, and a visited id cannot be wishlisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSets {
    visited: BTreeSet<String>,
    wishlisted: BTreeSet<String>,
}

impl IdSets {
    /// Builds the sets from stored lists. An id present in both lists is
    /// kept as visited only.
    pub fn from_lists<V, W>(visited: V, wishlisted: W) -> Self
    where
        V: IntoIterator<Item = String>,
        W: IntoIterator<Item = String>,
    {
        let visited: BTreeSet<String> = visited.into_iter().collect();
        let wishlisted = wishlisted
            .into_iter()
            .filter(|id| !visited.contains(id))
            .collect();
        Self {
            visited,
            wishlisted,
        }
    }

    #[must_use]
    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.contains(id)
    }

    #[must_use]
    pub fn is_wishlisted(&self, id: &str) -> bool {
        self.wishlisted.contains(id)
    }

    #[must_use]
    pub fn visited(&self) -> &BTreeSet<String> {
        &self.visited
    }

    #[must_use]
    pub fn wishlisted(&self) -> &BTreeSet<String> {
        &self.wishlisted
    }

    #[must_use]
    pub fn visited_list(&self) -> Vec<String> {
        self.visited.iter().cloned().collect()
    }

    #[must_use]
    pub fn wishlisted_list(&self) -> Vec<String> {
        self.wishlisted.iter().cloned().collect()
    }

    /// Un-visits a visited id, otherwise marks it visited and drops it from
    /// the wishlist. Returns whether the id is visited afterwards.
    pub fn toggle_visited(&mut self, id: &str) -> bool {
        if self.visited.remove(id) {
            return false;
        }
        self.visited.insert(id.to_owned());
        self.wishlisted.remove(id);
        true
    }

    /// Removes a wishlisted id, otherwise wishlists it unless it is already
    /// visited. Returns whether the id is wishlisted afterwards.
    pub fn toggle_wishlisted(&mut self, id: &str) -> bool {
        if self.wishlisted.remove(id) {
            return false;
        }
        if self.visited.contains(id) {
            return false;
        }
        self.wishlisted.insert(id.to_owned());
        true
    }
}

/// Stringifies a stored id. Older payloads may hold numeric ids.
pub(crate) fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn ids_from_values(values: Vec<Value>) -> Vec<String> {
    values.into_iter().filter_map(id_from_value).collect()
}

/// Serde helper for id arrays that may mix strings and numbers; `null`
/// reads as an empty list.
pub(crate) fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values.map(ids_from_values).unwrap_or_default())
}
