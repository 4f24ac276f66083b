use index::GraphIndex;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cache::SubgraphCache;
use crate::config::AppConfig;
use crate::metrics::Metrics;

/// One loaded dataset. Replaced as a whole, never edited.
pub struct LoadedGraph {
    pub generation: Uuid,
    pub index: GraphIndex,
}

pub struct AppState {
    pub config: AppConfig,
    graph: RwLock<Option<Arc<LoadedGraph>>>,
    pub cache: SubgraphCache,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let max_entries = if config.cache.enabled {
            config.cache.max_entries
        } else {
            0
        };
        Self {
            cache: SubgraphCache::new(max_entries),
            metrics: Metrics::new(),
            graph: RwLock::new(None),
            config,
        }
    }

    /// Current snapshot. Readers keep their `Arc` even if a new dataset is
    /// swapped in meanwhile.
    pub async fn current(&self) -> Option<Arc<LoadedGraph>> {
        self.graph.read().await.clone()
    }

    pub async fn swap(&self, index: GraphIndex) -> Arc<LoadedGraph> {
        let loaded = Arc::new(LoadedGraph {
            generation: Uuid::new_v4(),
            index,
        });

        let mut slot = self.graph.write().await;
        *slot = Some(Arc::clone(&loaded));
        drop(slot);

        let evicted = self.cache.len();
        self.cache.clear();
        tracing::info!(
            generation = %loaded.generation,
            evicted,
            entities = loaded.index.stats().entities,
            "Dataset swapped in"
        );
        loaded
    }
}
