use dashmap::DashMap;
use query::Subgraph;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Memoized extractions. Keys include the dataset fingerprint, so entries
/// from a previous dataset can never be served for the current one.
pub struct SubgraphCache {
    subgraphs: Arc<DashMap<String, Arc<Subgraph>>>,
    max_entries: usize,
}

impl SubgraphCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            subgraphs: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    pub fn key(fingerprint: &str, center_id: &str, depth: usize, max_nodes: usize) -> String {
        let mut hasher = Sha256::new();
        hasher.update(fingerprint.as_bytes());
        hasher.update([0]);
        hasher.update(center_id.as_bytes());
        hasher.update([0]);
        hasher.update(depth.to_le_bytes());
        hasher.update(max_nodes.to_le_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<Arc<Subgraph>> {
        self.subgraphs.get(key).map(|r| Arc::clone(r.value()))
    }

    pub fn insert(&self, key: String, subgraph: Arc<Subgraph>) {
        if self.max_entries == 0 {
            return;
        }
        if self.subgraphs.len() >= self.max_entries {
            // Simple eviction: drop 25% when full
            let to_remove: Vec<_> = self.subgraphs.iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.subgraphs.remove(&key);
            }
        }
        self.subgraphs.insert(key, subgraph);
    }

    pub fn len(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn clear(&self) {
        self.subgraphs.clear();
    }
}
