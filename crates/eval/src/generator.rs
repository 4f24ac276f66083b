use dataset::{Dataset, Edge, Entity, EntityKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Degree cap used by every profile except the dense hub phases.
pub const MAX_LINKS_PER_NODE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Small,    // ~100 entities, sparse
    Dense,    // 150 entities, hubs linked to nearly everything
    Deep,     // long alternating chains with side branches
    Massive,  // tens of thousands of entities, up to 500k links
}

impl FromStr for Profile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Profile::Small),
            "dense" => Ok(Profile::Dense),
            "deep" => Ok(Profile::Deep),
            "massive" => Ok(Profile::Massive),
            other => anyhow::bail!("Unknown profile: {}", other),
        }
    }
}

/// Build a synthetic theme/laboratory dataset. Same profile and seed always
/// give the same dataset.
pub fn generate(profile: Profile, seed: u64) -> Dataset {
    let mut builder = Builder::new(seed);

    match profile {
        Profile::Small => small(&mut builder),
        Profile::Dense => dense(&mut builder),
        Profile::Deep => deep(&mut builder),
        Profile::Massive => massive(&mut builder),
    }

    tracing::info!(
        ?profile,
        entities = builder.entities.len(),
        edges = builder.edges.len(),
        "Synthetic dataset generated"
    );
    builder.finish()
}

struct Builder {
    rng: StdRng,
    entities: Vec<Entity>,
    edges: Vec<Edge>,
    degree: Vec<usize>,
    existing: HashSet<(usize, usize)>,
    themes: usize,
    labs: usize,
}

impl Builder {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            entities: Vec::new(),
            edges: Vec::new(),
            degree: Vec::new(),
            existing: HashSet::new(),
            themes: 0,
            labs: 0,
        }
    }

    fn theme(&mut self) -> usize {
        self.themes += 1;
        let id = format!("THEME_{:06}", self.themes - 1);
        let name = format!("Thème {}", self.themes);
        self.push(Entity::new(id, name, EntityKind::Theme))
    }

    fn lab(&mut self) -> usize {
        self.labs += 1;
        let id = format!("LAB_{:06}", self.labs - 1);
        let name = format!("Laboratoire {}", self.labs);
        self.push(Entity::new(id, name, EntityKind::Laboratory))
    }

    fn push(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.degree.push(0);
        self.entities.len() - 1
    }

    /// Link two entities unless it would be a self-loop, a duplicate pair,
    /// or push either side past `cap`.
    fn link(&mut self, a: usize, b: usize, cap: Option<usize>) -> bool {
        if a == b {
            return false;
        }
        if let Some(cap) = cap {
            if self.degree[a] >= cap || self.degree[b] >= cap {
                return false;
            }
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if !self.existing.insert(key) {
            return false;
        }

        self.edges.push(Edge::new(
            self.entities[a].id.clone(),
            self.entities[b].id.clone(),
        ));
        self.degree[a] += 1;
        self.degree[b] += 1;
        true
    }

    fn capped(&mut self, a: usize, b: usize) -> bool {
        self.link(a, b, Some(MAX_LINKS_PER_NODE))
    }

    fn finish(self) -> Dataset {
        Dataset::new(self.entities, self.edges)
    }
}

fn small(b: &mut Builder) {
    let themes: Vec<usize> = (0..40).map(|_| b.theme()).collect();
    let labs: Vec<usize> = (0..60).map(|_| b.lab()).collect();

    for &lab in &labs {
        let count = b.rng.gen_range(1..=4);
        for _ in 0..count {
            let theme = themes[b.rng.gen_range(0..themes.len())];
            b.capped(lab, theme);
        }
    }
}

fn dense(b: &mut Builder) {
    const TOTAL: usize = 150;
    for i in 0..TOTAL {
        if i < TOTAL / 2 {
            b.theme();
        } else {
            b.lab();
        }
    }
    let all: Vec<usize> = (0..TOTAL).collect();

    // Super hubs: linked to everyone
    for hub in 0..5 {
        for &other in &all {
            b.link(hub, other, None);
        }
    }

    // Medium hubs: 100 random partners each
    for hub in 5..25 {
        let mut partners = all.clone();
        partners.shuffle(&mut b.rng);
        for &other in partners.iter().take(100) {
            b.link(hub, other, None);
        }
    }

    // Everyone else
    for node in 25..TOTAL {
        let wanted = b.rng.gen_range(30..=60);
        for _ in 0..wanted {
            let other = b.rng.gen_range(0..TOTAL);
            b.link(node, other, None);
        }
    }
}

fn deep(b: &mut Builder) {
    const CHAINS: usize = 500;
    const CHAIN_LENGTH: usize = 20;
    const BRANCH_POINTS: [usize; 4] = [3, 7, 11, 15];

    let mut chain_heads = Vec::with_capacity(CHAINS);

    for _ in 0..CHAINS {
        let chain: Vec<usize> = (0..CHAIN_LENGTH)
            .map(|i| if i % 2 == 0 { b.theme() } else { b.lab() })
            .collect();
        for pair in chain.windows(2) {
            b.capped(pair[0], pair[1]);
        }

        for &point in &BRANCH_POINTS {
            let branches = b.rng.gen_range(2..=4);
            for _ in 0..branches {
                let anchor = chain[point];
                let branch = if point % 2 == 0 { b.lab() } else { b.theme() };
                b.capped(anchor, branch);

                // Short tail hanging off the branch
                let mut tip = branch;
                for step in 0..b.rng.gen_range(0..=3) {
                    let next = if (point + step) % 2 == 0 { b.theme() } else { b.lab() };
                    b.capped(tip, next);
                    tip = next;
                }
            }
        }
        chain_heads.push(chain[0]);
    }

    // A few bridges so chains are not all separate components
    for _ in 0..CHAINS / 5 {
        let a = chain_heads[b.rng.gen_range(0..chain_heads.len())];
        let c = chain_heads[b.rng.gen_range(0..chain_heads.len())];
        b.capped(a, c);
    }
}

fn massive(b: &mut Builder) {
    const TARGET_EDGES: usize = 500_000;
    const HUBS: usize = 200;
    const THEMES: usize = 12_000;
    const LABS: usize = 30_000;

    let hubs: Vec<usize> = (0..HUBS).map(|_| b.theme()).collect();
    let themes: Vec<usize> = (0..THEMES).map(|_| b.theme()).collect();
    let labs: Vec<usize> = (0..LABS).map(|_| b.lab()).collect();

    // Hubs first, so they fill up to the cap
    for &hub in &hubs {
        for _ in 0..MAX_LINKS_PER_NODE * 2 {
            let lab = labs[b.rng.gen_range(0..labs.len())];
            b.capped(hub, lab);
        }
    }

    let mut attempts = 0;
    while b.edges.len() < TARGET_EDGES && attempts < TARGET_EDGES * 4 {
        attempts += 1;
        let theme = themes[b.rng.gen_range(0..themes.len())];
        let lab = labs[b.rng.gen_range(0..labs.len())];
        b.capped(theme, lab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use index::GraphIndex;

    fn check_invariants(dataset: &Dataset, cap: Option<usize>) {
        let index = GraphIndex::build(dataset);
        let stats = index.stats();

        assert_eq!(stats.self_loops, 0);
        assert_eq!(stats.dangling_edges, 0);
        assert_eq!(stats.unique_links, stats.edges, "duplicate pair generated");

        if let Some(cap) = cap {
            for entity in dataset.entities.iter() {
                assert!(index.adjacency().degree(&entity.id) <= cap);
            }
        }
    }

    #[test]
    fn test_small() {
        let dataset = generate(Profile::Small, 1);
        assert_eq!(dataset.entities.len(), 100);
        assert!(!dataset.edges.is_empty());
        check_invariants(&dataset, Some(MAX_LINKS_PER_NODE));
    }

    #[test]
    fn test_dense_has_super_hubs() {
        let dataset = generate(Profile::Dense, 2);
        assert_eq!(dataset.entities.len(), 150);
        check_invariants(&dataset, None);

        let index = GraphIndex::build(&dataset);
        assert_eq!(index.adjacency().degree("THEME_000000"), 149);
    }

    #[test]
    fn test_deep_reaches_far() {
        let dataset = generate(Profile::Deep, 3);
        check_invariants(&dataset, Some(MAX_LINKS_PER_NODE));

        let index = GraphIndex::build(&dataset);
        let subgraph = query::NeighborhoodExtractor::new(&index).extract("THEME_000000", usize::MAX, 5);
        assert_eq!(subgraph.max_depth(), Some(5));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate(Profile::Small, 9), generate(Profile::Small, 9));
        assert_ne!(generate(Profile::Small, 9), generate(Profile::Small, 10));
    }

    #[test]
    fn test_profile_names() {
        assert_eq!("Dense".parse::<Profile>().unwrap(), Profile::Dense);
        assert!("huge".parse::<Profile>().is_err());
    }
}
