use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::subgraph::{Subgraph, SubgraphEdge};

/// What changed between two consecutive views, for the transition layer
/// (fade in entering nodes, fade out exiting ones, keep positions of staying
/// ones).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphDiff {
    pub entering: Vec<String>,
    pub exiting: Vec<String>,
    pub staying: Vec<String>,
    pub entering_edges: Vec<SubgraphEdge>,
    pub exiting_edges: Vec<SubgraphEdge>,
}

impl SubgraphDiff {
    pub fn is_unchanged(&self) -> bool {
        self.entering.is_empty()
            && self.exiting.is_empty()
            && self.entering_edges.is_empty()
            && self.exiting_edges.is_empty()
    }
}

/// Compare two subgraphs. Entering and staying ids follow `next` order,
/// exiting ids follow `previous` order. Edges compare as unordered pairs.
pub fn diff_subgraphs(previous: &Subgraph, next: &Subgraph) -> SubgraphDiff {
    let previous_ids: HashSet<&str> = previous.nodes.iter().map(|n| n.id.as_str()).collect();
    let next_ids: HashSet<&str> = next.nodes.iter().map(|n| n.id.as_str()).collect();

    let mut diff = SubgraphDiff::default();

    for node in &next.nodes {
        if previous_ids.contains(node.id.as_str()) {
            diff.staying.push(node.id.clone());
        } else {
            diff.entering.push(node.id.clone());
        }
    }
    diff.exiting = previous
        .nodes
        .iter()
        .filter(|n| !next_ids.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    let previous_edges: HashSet<(&str, &str)> = previous.edges.iter().map(|e| e.pair_key()).collect();
    let next_edges: HashSet<(&str, &str)> = next.edges.iter().map(|e| e.pair_key()).collect();

    diff.entering_edges = next
        .edges
        .iter()
        .filter(|e| !previous_edges.contains(&e.pair_key()))
        .cloned()
        .collect();
    diff.exiting_edges = previous
        .edges
        .iter()
        .filter(|e| !next_edges.contains(&e.pair_key()))
        .cloned()
        .collect();

    diff
}
