use dataset::EntityKind;
use index::{AdjacencyIndex, EntityIndex, GraphIndex};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Default node cap of the graph view.
pub const DEFAULT_MAX_NODES: usize = 50;

/// Default expansion depth of the graph view.
pub const DEFAULT_MAX_DEPTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Hops from the center (the center is 0).
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubgraphEdge {
    pub source: String,
    pub target: String,
}

impl SubgraphEdge {
    /// Order-independent key: (A,B) and (B,A) share it.
    pub fn pair_key(&self) -> (&str, &str) {
        pair_key(&self.source, &self.target)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: Vec<SubgraphNode>,
    pub edges: Vec<SubgraphEdge>,
    /// Nodes reached within the depth limit, before the node cap applied.
    pub discovered: usize,
}

impl Subgraph {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Nothing to show: no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// True when the node cap dropped some reachable nodes.
    pub fn is_truncated(&self) -> bool {
        self.discovered > self.nodes.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.nodes.iter().map(|n| n.depth).max()
    }
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Compute the neighborhood of `center_id` to render.
///
/// Breadth-first, one level at a time, up to `max_depth` hops. Every reached
/// node keeps its minimum hop count. The reached set is then ordered by depth
/// (ties keep discovery order) and cut to `max_nodes`, so a farther node never
/// displaces a closer one. Edges are those of the adjacency index with both
/// endpoints kept, each unordered pair emitted once.
///
/// An unknown center or `max_nodes == 0` gives an empty subgraph. Ids that
/// appear in the adjacency index without an entity record are not traversed.
pub fn extract_subgraph(
    center_id: &str,
    entity_index: &EntityIndex,
    adjacency: &AdjacencyIndex,
    max_nodes: usize,
    max_depth: usize,
) -> Subgraph {
    if !entity_index.contains(center_id) || max_nodes == 0 {
        return Subgraph::empty();
    }

    // Insertion order of this map is the tie-break within a depth band.
    let mut depths: IndexMap<&str, usize> = IndexMap::new();
    depths.insert(center_id, 0);

    let mut frontier: IndexSet<&str> = IndexSet::new();
    frontier.insert(center_id);

    for depth in 1..=max_depth {
        let mut next: IndexSet<&str> = IndexSet::new();

        for &node_id in &frontier {
            let Some(neighbors) = adjacency.neighbors(node_id) else {
                continue;
            };
            for neighbor in neighbors {
                let neighbor = neighbor.as_str();
                if depths.contains_key(neighbor) || !entity_index.contains(neighbor) {
                    continue;
                }
                depths.insert(neighbor, depth);
                next.insert(neighbor);
            }
        }

        frontier = next;
        if frontier.is_empty() {
            break;
        }
    }

    let discovered = depths.len();

    // Stable sort: equal depths keep insertion order.
    let mut ranked: Vec<(&str, usize)> = depths.into_iter().collect();
    ranked.sort_by_key(|&(_, depth)| depth);
    ranked.truncate(max_nodes);

    let visible: HashSet<&str> = ranked.iter().map(|&(id, _)| id).collect();

    let nodes: Vec<SubgraphNode> = ranked
        .iter()
        .filter_map(|&(id, depth)| {
            entity_index.get(id).map(|entity| SubgraphNode {
                id: entity.id.clone(),
                name: entity.name.clone(),
                kind: entity.kind,
                depth,
            })
        })
        .collect();

    let mut edges = Vec::new();
    let mut emitted: HashSet<(&str, &str)> = HashSet::new();

    for &(node_id, _) in &ranked {
        let Some(neighbors) = adjacency.neighbors(node_id) else {
            continue;
        };
        for neighbor in neighbors {
            let neighbor = neighbor.as_str();
            if !visible.contains(neighbor) {
                continue;
            }
            if emitted.insert(pair_key(node_id, neighbor)) {
                edges.push(SubgraphEdge {
                    source: node_id.to_string(),
                    target: neighbor.to_string(),
                });
            }
        }
    }

    debug!(
        center = center_id,
        max_depth,
        max_nodes,
        discovered,
        nodes = nodes.len(),
        edges = edges.len(),
        "Subgraph extracted"
    );

    Subgraph {
        nodes,
        edges,
        discovered,
    }
}

/// Runs extractions against one loaded `GraphIndex`.
pub struct NeighborhoodExtractor<'a> {
    index: &'a GraphIndex,
}

impl<'a> NeighborhoodExtractor<'a> {
    pub fn new(index: &'a GraphIndex) -> Self {
        Self { index }
    }

    pub fn extract(&self, center_id: &str, max_nodes: usize, max_depth: usize) -> Subgraph {
        extract_subgraph(
            center_id,
            self.index.entity_index(),
            self.index.adjacency(),
            max_nodes,
            max_depth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::{Dataset, Edge, Entity};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{HashMap, VecDeque};

    fn index_of(entities: Vec<Entity>, edges: Vec<Edge>) -> GraphIndex {
        GraphIndex::build(&Dataset::new(entities, edges))
    }

    fn abc() -> GraphIndex {
        index_of(
            vec![
                Entity::new("A", "A", EntityKind::Theme),
                Entity::new("B", "B", EntityKind::Laboratory),
                Entity::new("C", "C", EntityKind::Theme),
            ],
            vec![Edge::new("A", "B"), Edge::new("B", "C")],
        )
    }

    fn ids(subgraph: &Subgraph) -> Vec<(&str, usize)> {
        subgraph.nodes.iter().map(|n| (n.id.as_str(), n.depth)).collect()
    }

    fn edge(source: &str, target: &str) -> SubgraphEdge {
        SubgraphEdge {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_depth_one() {
        let index = abc();
        let subgraph = NeighborhoodExtractor::new(&index).extract("A", 10, 1);

        assert_eq!(ids(&subgraph), vec![("A", 0), ("B", 1)]);
        assert_eq!(subgraph.edges, vec![edge("A", "B")]);
        assert_eq!(subgraph.nodes[1].kind, EntityKind::Laboratory);
    }

    #[test]
    fn test_depth_two() {
        let index = abc();
        let subgraph = NeighborhoodExtractor::new(&index).extract("A", 10, 2);

        assert_eq!(ids(&subgraph), vec![("A", 0), ("B", 1), ("C", 2)]);
        assert_eq!(subgraph.edges, vec![edge("A", "B"), edge("B", "C")]);
        assert!(!subgraph.is_truncated());
    }

    #[test]
    fn test_unknown_center() {
        let index = abc();
        let subgraph = NeighborhoodExtractor::new(&index).extract("nonexistent", 50, 2);
        assert!(subgraph.is_empty());
        assert_eq!(subgraph, Subgraph::empty());
    }

    #[test]
    fn test_zero_depth() {
        let index = abc();
        let subgraph = NeighborhoodExtractor::new(&index).extract("B", 50, 0);
        assert_eq!(ids(&subgraph), vec![("B", 0)]);
        assert!(subgraph.edges.is_empty());
    }

    #[test]
    fn test_node_cap_bounds() {
        let index = abc();
        let extractor = NeighborhoodExtractor::new(&index);

        assert!(extractor.extract("A", 0, 2).is_empty());

        let only_center = extractor.extract("B", 1, 2);
        assert_eq!(ids(&only_center), vec![("B", 0)]);
        assert!(only_center.edges.is_empty());
        assert_eq!(only_center.discovered, 3);
        assert!(only_center.is_truncated());
    }

    #[test]
    fn test_self_loop_emitted_once() {
        let index = index_of(
            vec![
                Entity::new("A", "A", EntityKind::Theme),
                Entity::new("B", "B", EntityKind::Laboratory),
            ],
            vec![Edge::new("A", "A"), Edge::new("A", "B"), Edge::new("A", "A")],
        );
        let subgraph = NeighborhoodExtractor::new(&index).extract("A", 10, 1);

        assert_eq!(ids(&subgraph), vec![("A", 0), ("B", 1)]);
        let loops = subgraph.edges.iter().filter(|e| e.source == e.target).count();
        assert_eq!(loops, 1);
        assert_eq!(subgraph.edges.len(), 2);
    }

    #[test]
    fn test_reversed_duplicates_emit_one_edge() {
        let index = index_of(
            vec![
                Entity::new("A", "A", EntityKind::Theme),
                Entity::new("B", "B", EntityKind::Laboratory),
            ],
            vec![Edge::new("A", "B"), Edge::new("B", "A")],
        );
        let subgraph = NeighborhoodExtractor::new(&index).extract("B", 10, 3);
        assert_eq!(subgraph.edges, vec![edge("B", "A")]);
    }

    #[test]
    fn test_empty_id_is_a_valid_center() {
        let index = index_of(
            vec![
                Entity::new("", "Unnamed", EntityKind::Theme),
                Entity::new("B", "B", EntityKind::Laboratory),
            ],
            vec![Edge::new("", "B")],
        );
        let extractor = NeighborhoodExtractor::new(&index);

        let subgraph = extractor.extract("", 10, 1);
        assert_eq!(ids(&subgraph), vec![("", 0), ("B", 1)]);
        assert_eq!(subgraph.edges, vec![edge("", "B")]);

        let from_neighbor = extractor.extract("B", 10, 1);
        assert_eq!(ids(&from_neighbor), vec![("B", 0), ("", 1)]);
    }

    #[test]
    fn test_dangling_neighbors_skipped() {
        let index = index_of(
            vec![
                Entity::new("A", "A", EntityKind::Theme),
                Entity::new("C", "C", EntityKind::Theme),
            ],
            vec![Edge::new("A", "ghost"), Edge::new("ghost", "C")],
        );
        let subgraph = NeighborhoodExtractor::new(&index).extract("A", 10, 3);
        assert_eq!(ids(&subgraph), vec![("A", 0)]);
        assert!(subgraph.edges.is_empty());
    }

    #[test]
    fn test_truncation_keeps_discovery_order() {
        // hub links to four leaves, each leaf has one more neighbor
        let mut entities = vec![Entity::new("hub", "Hub", EntityKind::Theme)];
        let mut edges = Vec::new();
        for leaf in ["d", "b", "c", "a"] {
            entities.push(Entity::new(leaf, leaf, EntityKind::Laboratory));
            edges.push(Edge::new("hub", leaf));
            let far = format!("{}2", leaf);
            entities.push(Entity::new(far.clone(), far.clone(), EntityKind::Theme));
            edges.push(Edge::new(leaf, far));
        }
        let index = index_of(entities, edges);
        let subgraph = NeighborhoodExtractor::new(&index).extract("hub", 3, 2);

        assert_eq!(ids(&subgraph), vec![("hub", 0), ("d", 1), ("b", 1)]);
        assert_eq!(subgraph.discovered, 9);
        assert_eq!(subgraph.edges, vec![edge("hub", "d"), edge("hub", "b")]);
    }

    #[test]
    fn test_idempotent() {
        let index = random_index(7, 200, 600);
        let extractor = NeighborhoodExtractor::new(&index);

        let first = extractor.extract("n0", 40, 3);
        let second = extractor.extract("n0", 40, 3);
        assert_eq!(first, second);

        let rebuilt = random_index(7, 200, 600);
        let third = NeighborhoodExtractor::new(&rebuilt).extract("n0", 40, 3);
        assert_eq!(first, third);
    }

    fn random_index(seed: u64, nodes: usize, edges: usize) -> GraphIndex {
        let mut rng = StdRng::seed_from_u64(seed);
        let entities = (0..nodes)
            .map(|i| {
                let kind = if i % 2 == 0 { EntityKind::Theme } else { EntityKind::Laboratory };
                Entity::new(format!("n{}", i), format!("Node {}", i), kind)
            })
            .collect();
        let edges = (0..edges)
            .map(|_| {
                let a = rng.gen_range(0..nodes);
                let b = rng.gen_range(0..nodes);
                Edge::new(format!("n{}", a), format!("n{}", b))
            })
            .collect();
        index_of(entities, edges)
    }

    fn brute_force_depths(index: &GraphIndex, center: &str) -> HashMap<String, usize> {
        let mut depths = HashMap::new();
        let mut queue = VecDeque::new();
        depths.insert(center.to_string(), 0);
        queue.push_back(center.to_string());

        while let Some(id) = queue.pop_front() {
            let depth = depths[&id];
            if let Some(neighbors) = index.adjacency().neighbors(&id) {
                for neighbor in neighbors {
                    if !depths.contains_key(neighbor) {
                        depths.insert(neighbor.clone(), depth + 1);
                        queue.push_back(neighbor.clone());
                    }
                }
            }
        }
        depths
    }

    #[test]
    fn test_depths_match_shortest_paths() {
        for seed in 0..20 {
            let index = random_index(seed, 120, 180);
            let truth = brute_force_depths(&index, "n3");

            for max_depth in 0..5 {
                let subgraph = NeighborhoodExtractor::new(&index).extract("n3", usize::MAX, max_depth);
                let expected = truth.values().filter(|&&d| d <= max_depth).count();

                assert_eq!(subgraph.nodes.len(), expected, "seed {} depth {}", seed, max_depth);
                for node in &subgraph.nodes {
                    assert_eq!(node.depth, truth[&node.id], "seed {} node {}", seed, node.id);
                }
            }
        }
    }

    #[test]
    fn test_truncation_priority_and_edge_closure() {
        for seed in 0..20 {
            let index = random_index(seed, 150, 400);
            let full = NeighborhoodExtractor::new(&index).extract("n1", usize::MAX, 4);
            let capped = NeighborhoodExtractor::new(&index).extract("n1", 25, 4);

            let kept: HashSet<&str> = capped.nodes.iter().map(|n| n.id.as_str()).collect();
            let deepest_kept = capped.max_depth().unwrap_or(0);
            for node in full.nodes.iter().filter(|n| !kept.contains(n.id.as_str())) {
                assert!(node.depth >= deepest_kept, "seed {}", seed);
            }

            let mut seen = HashSet::new();
            for e in &capped.edges {
                assert!(kept.contains(e.source.as_str()));
                assert!(kept.contains(e.target.as_str()));
                let key = e.pair_key();
                assert!(seen.insert((key.0.to_string(), key.1.to_string())));
            }
        }
    }
}
