use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub json_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Node cap applied when the request does not give one
    pub max_nodes: usize,
    pub default_depth: usize,
    /// Deepest expansion a request may ask for
    pub max_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "0.0.0.0:3000".to_string(),
                json_logs: false,
            },
            graph: GraphConfig {
                max_nodes: 2000,
                default_depth: query::DEFAULT_MAX_DEPTH,
                max_depth: 5,
            },
            search: SearchConfig {
                max_results: query::DEFAULT_MAX_RESULTS,
            },
            cache: CacheConfig {
                enabled: true,
                max_entries: 10000,
            },
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `MINDMAP_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = env::var("MINDMAP_BIND_ADDR") {
            config.server.bind_addr = addr;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            config.server.json_logs = format.eq_ignore_ascii_case("json");
        }
        override_from_env("MINDMAP_MAX_NODES", &mut config.graph.max_nodes);
        override_from_env("MINDMAP_DEFAULT_DEPTH", &mut config.graph.default_depth);
        override_from_env("MINDMAP_MAX_DEPTH", &mut config.graph.max_depth);
        override_from_env("MINDMAP_SEARCH_MAX_RESULTS", &mut config.search.max_results);
        override_from_env("MINDMAP_CACHE_ENABLED", &mut config.cache.enabled);
        override_from_env("MINDMAP_CACHE_MAX_ENTRIES", &mut config.cache.max_entries);

        if config.graph.default_depth > config.graph.max_depth {
            config.graph.default_depth = config.graph.max_depth;
        }
        config
    }
}

fn override_from_env<T: FromStr>(key: &str, slot: &mut T) {
    if let Ok(raw) = env::var(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => tracing::warn!(key, value = %raw, "Ignoring invalid config value"),
        }
    }
}
