use dataset::Edge;
use indexmap::{IndexMap, IndexSet};

/// Entity id -> ids directly linked to it.
///
/// Keys and neighbor sets keep insertion order, so iterating the index twice
/// over the same edge list always visits ids in the same order.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    neighbors: IndexMap<String, IndexSet<String>>,
}

impl AdjacencyIndex {
    /// Build the index from a raw edge list. Every edge is recorded in both
    /// directions and both endpoints get an entry, known entity or not.
    /// Duplicate edges collapse into one neighbor entry.
    pub fn build(edges: &[Edge]) -> Self {
        let mut neighbors: IndexMap<String, IndexSet<String>> = IndexMap::new();

        for edge in edges {
            neighbors
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());
            neighbors
                .entry(edge.target.clone())
                .or_default()
                .insert(edge.source.clone());
        }

        Self { neighbors }
    }

    pub fn neighbors(&self, id: &str) -> Option<&IndexSet<String>> {
        self.neighbors.get(id)
    }

    /// Number of distinct ids linked to `id` (0 when absent).
    pub fn degree(&self, id: &str) -> usize {
        self.neighbors.get(id).map_or(0, |set| set.len())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.neighbors.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.neighbors.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Number of distinct unordered pairs (self-loops count once).
    pub fn unique_links(&self) -> usize {
        let mut doubled = 0;
        let mut loops = 0;
        for (id, set) in &self.neighbors {
            doubled += set.len();
            if set.contains(id) {
                loops += 1;
            }
        }
        // A self-loop shows up once in its own set, every other pair twice.
        (doubled - loops) / 2 + loops
    }
}

pub fn build_adjacency_index(edges: &[Edge]) -> AdjacencyIndex {
    AdjacencyIndex::build(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        let index = build_adjacency_index(&[Edge::new("A", "B"), Edge::new("B", "C")]);

        assert!(index.neighbors("A").unwrap().contains("B"));
        assert!(index.neighbors("B").unwrap().contains("A"));
        assert!(index.neighbors("B").unwrap().contains("C"));
        assert!(index.neighbors("C").unwrap().contains("B"));
        assert_eq!(index.degree("B"), 2);
    }

    #[test]
    fn test_duplicates_collapse() {
        let index = build_adjacency_index(&[
            Edge::new("A", "B"),
            Edge::new("B", "A"),
            Edge::new("A", "B"),
        ]);

        assert_eq!(index.degree("A"), 1);
        assert_eq!(index.degree("B"), 1);
        assert_eq!(index.unique_links(), 1);
    }

    #[test]
    fn test_self_loop() {
        let index = build_adjacency_index(&[Edge::new("A", "A"), Edge::new("A", "B")]);

        let a = index.neighbors("A").unwrap();
        assert!(a.contains("A"));
        assert_eq!(a.len(), 2);
        assert_eq!(index.unique_links(), 2);
    }

    #[test]
    fn test_unknown_endpoints_get_entries() {
        let index = build_adjacency_index(&[Edge::new("A", "ghost")]);
        assert!(index.contains("ghost"));
        assert_eq!(index.degree("missing"), 0);
    }

    #[test]
    fn test_neighbor_order_follows_edges() {
        let index = build_adjacency_index(&[
            Edge::new("hub", "z"),
            Edge::new("a", "hub"),
            Edge::new("hub", "m"),
        ]);

        let order: Vec<&str> = index.neighbors("hub").unwrap().iter().map(|s| s.as_str()).collect();
        assert_eq!(order, vec!["z", "a", "m"]);

        let keys: Vec<&str> = index.ids().collect();
        assert_eq!(keys, vec!["hub", "z", "a", "m"]);
    }
}
