//! Read-only views over the normalized catalog: substring search, set
//! membership listings and visited statistics.

use std::collections::BTreeMap;

use crate::castle::Castle;

/// Castles whose search blob contains `query` (case-insensitive), in
/// dataset order, capped at `limit`. The query is matched as typed,
/// surrounding spaces included; an empty query matches nothing.
#[must_use]
pub fn search<'a>(castles: &'a [Castle], query: &str, limit: usize) -> Vec<&'a Castle> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    castles
        .iter()
        .filter(|c| c.search_blob.contains(&needle))
        .take(limit)
        .collect()
}

/// Castles whose id satisfies `is_member`, in dataset order.
pub fn select<'a, F>(castles: &'a [Castle], is_member: F) -> Vec<&'a Castle>
where
    F: Fn(&str) -> bool,
{
    castles.iter().filter(|c| is_member(&c.id)).collect()
}

/// Counts over the visited castles, keyed by display label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedStats {
    pub total: usize,
    pub by_era: BTreeMap<String, usize>,
    pub by_style: BTreeMap<String, usize>,
}

/// Aggregates era and style counts over the castles accepted by `is_visited`.
///
/// Ids in the visited set that are absent from the dataset are not counted.
pub fn visited_stats<F>(castles: &[Castle], is_visited: F) -> VisitedStats
where
    F: Fn(&str) -> bool,
{
    let mut stats = VisitedStats::default();
    for castle in castles.iter().filter(|c| is_visited(&c.id)) {
        stats.total += 1;
        *stats.by_era.entry(castle.era.clone()).or_default() += 1;
        *stats.by_style.entry(castle.style.clone()).or_default() += 1;
    }
    stats
}
