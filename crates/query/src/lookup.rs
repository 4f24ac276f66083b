use dataset::Entity;
use icu_collator::{Collator, CollatorOptions};
use index::AdjacencyIndex;
use std::cmp::Ordering;

/// Default number of search suggestions.
pub const DEFAULT_MAX_RESULTS: usize = 15;

/// Number of distinct entities linked to `id`, 0 when unknown.
pub fn count_connections(id: &str, adjacency: &AdjacencyIndex) -> usize {
    adjacency.degree(id)
}

/// Case-insensitive substring search over entity names.
///
/// Names starting with the query come first, then names merely containing
/// it; each group is in name order. A blank query matches nothing.
pub fn search_entities(query: &str, entities: &[Entity], max_results: usize) -> Vec<Entity> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<(bool, &Entity)> = entities
        .iter()
        .filter_map(|entity| {
            let name = entity.name.to_lowercase();
            name.find(&needle).map(|pos| (pos == 0, entity))
        })
        .collect();

    let order = NameOrder::new();
    matches.sort_by(|(a_prefix, a), (b_prefix, b)| {
        b_prefix
            .cmp(a_prefix)
            .then_with(|| order.compare(&a.name, &b.name))
    });

    matches
        .into_iter()
        .take(max_results)
        .map(|(_, entity)| entity.clone())
        .collect()
}

/// Locale-aware name ordering (Unicode Collation Algorithm, root locale).
///
/// Accented letters sort with their base letter, and on a tie lowercase sorts
/// before uppercase.
pub struct NameOrder {
    collator: Option<Collator>,
}

impl NameOrder {
    pub fn new() -> Self {
        let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
            .map_err(|e| tracing::warn!(error = %e, "Collator unavailable, using code point order"))
            .ok();
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.cmp(b),
        }
    }
}

impl Default for NameOrder {
    fn default() -> Self {
        Self::new()
    }
}
