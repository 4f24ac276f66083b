pub mod adjacency;
pub mod entity_index;

pub use adjacency::{AdjacencyIndex, build_adjacency_index};
pub use entity_index::{EntityIndex, build_entity_index};

use dataset::{Dataset, Entity};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Both indices of one loaded dataset, plus the entity list search runs over.
///
/// A `GraphIndex` is never mutated after `build`; loading another dataset
/// means building a new one and swapping it in.
#[derive(Debug, Clone)]
pub struct GraphIndex {
    entities: Vec<Entity>,
    entity_index: EntityIndex,
    adjacency: AdjacencyIndex,
    stats: IndexStats,
    fingerprint: String,
}

impl GraphIndex {
    pub fn build(dataset: &Dataset) -> Self {
        debug!(
            entities = dataset.entities.len(),
            edges = dataset.edges.len(),
            "Building graph index"
        );

        let entity_index = EntityIndex::build(&dataset.entities);
        let adjacency = AdjacencyIndex::build(&dataset.edges);

        let dangling_edges = dataset
            .edges
            .iter()
            .filter(|e| !entity_index.contains(&e.source) || !entity_index.contains(&e.target))
            .count();
        let self_loops = dataset.edges.iter().filter(|e| e.is_self_loop()).count();

        let stats = IndexStats {
            entities: entity_index.len(),
            edges: dataset.edges.len(),
            adjacency_keys: adjacency.len(),
            unique_links: adjacency.unique_links(),
            dangling_edges,
            self_loops,
        };
        let fingerprint = fingerprint(dataset);

        info!(
            entities = stats.entities,
            unique_links = stats.unique_links,
            dangling_edges = stats.dangling_edges,
            fingerprint = %&fingerprint[..12],
            "Graph index built"
        );

        Self {
            entities: dataset.entities.clone(),
            entity_index,
            adjacency,
            stats,
            fingerprint,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_index(&self) -> &EntityIndex {
        &self.entity_index
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// SHA-256 (hex) of the dataset this index was built from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct IndexStats {
    pub entities: usize,
    pub edges: usize,
    pub adjacency_keys: usize,
    pub unique_links: usize,
    pub dangling_edges: usize,
    pub self_loops: usize,
}

/// Generate a stable dataset id from its contents
pub fn fingerprint(dataset: &Dataset) -> String {
    let mut hasher = Sha256::new();

    for entity in &dataset.entities {
        hasher.update(entity.id.as_bytes());
        hasher.update([0x1f]);
        hasher.update(entity.name.as_bytes());
        hasher.update([0x1f]);
        hasher.update(entity.kind.as_str().as_bytes());
        hasher.update([0x1e]);
    }
    hasher.update([0x1d]);

    for edge in &dataset.edges {
        hasher.update(edge.source.as_bytes());
        hasher.update([0x1f]);
        hasher.update(edge.target.as_bytes());
        if let Some(weight) = edge.weight {
            hasher.update([0x1f]);
            hasher.update(weight.to_bits().to_le_bytes());
        }
        hasher.update([0x1e]);
    }

    hex::encode(hasher.finalize())
}
