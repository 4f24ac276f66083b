pub mod diff;
pub mod lookup;
pub mod subgraph;

pub use diff::{SubgraphDiff, diff_subgraphs};
pub use lookup::{DEFAULT_MAX_RESULTS, NameOrder, count_connections, search_entities};
pub use subgraph::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, NeighborhoodExtractor, Subgraph, SubgraphEdge,
    SubgraphNode, extract_subgraph,
};

pub use index::{build_adjacency_index, build_entity_index};
