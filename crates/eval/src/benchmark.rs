use index::{GraphIndex, IndexStats};
use query::NeighborhoodExtractor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub dataset: DatasetSummary,
    pub max_nodes: usize,
    pub by_depth: Vec<DepthResults>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub entities: usize,
    pub unique_links: usize,
    pub fingerprint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthResults {
    pub depth: usize,
    pub samples: usize,
    pub avg_latency_ms: f64,
    pub p50_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub stddev_latency_ms: f64,
    pub avg_nodes: f64,
    pub avg_edges: f64,
    /// Share of extractions where the node cap dropped nodes
    pub truncated_ratio: f64,
}

pub struct Benchmarker<'a> {
    index: &'a GraphIndex,
    max_nodes: usize,
    seed: u64,
}

impl<'a> Benchmarker<'a> {
    pub fn new(index: &'a GraphIndex, max_nodes: usize) -> Self {
        Self {
            index,
            max_nodes,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Time `samples` extractions per depth, around randomly picked centers.
    /// Every depth uses the same centers.
    pub fn run(&self, depths: &[usize], samples: usize) -> BenchmarkResults {
        let entities = self.index.entities();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let centers: Vec<&str> = if entities.is_empty() {
            Vec::new()
        } else {
            (0..samples)
                .map(|_| entities[rng.gen_range(0..entities.len())].id.as_str())
                .collect()
        };

        let extractor = NeighborhoodExtractor::new(self.index);
        let by_depth = depths
            .iter()
            .map(|&depth| {
                tracing::info!(depth, samples = centers.len(), "Benchmarking depth");
                self.run_depth(&extractor, &centers, depth)
            })
            .collect();

        BenchmarkResults {
            dataset: summary(self.index.stats(), self.index.fingerprint()),
            max_nodes: self.max_nodes,
            by_depth,
        }
    }

    fn run_depth(&self, extractor: &NeighborhoodExtractor, centers: &[&str], depth: usize) -> DepthResults {
        let mut latencies = Vec::with_capacity(centers.len());
        let mut nodes = 0usize;
        let mut edges = 0usize;
        let mut truncated = 0usize;

        for center in centers {
            let start = Instant::now();
            let subgraph = extractor.extract(center, self.max_nodes, depth);
            latencies.push(start.elapsed().as_secs_f64() * 1000.0);

            nodes += subgraph.nodes.len();
            edges += subgraph.edges.len();
            if subgraph.is_truncated() {
                truncated += 1;
            }
        }

        compute_results(depth, latencies, nodes, edges, truncated)
    }
}

fn summary(stats: &IndexStats, fingerprint: &str) -> DatasetSummary {
    DatasetSummary {
        entities: stats.entities,
        unique_links: stats.unique_links,
        fingerprint: fingerprint.to_string(),
    }
}

fn compute_results(
    depth: usize,
    mut latencies: Vec<f64>,
    nodes: usize,
    edges: usize,
    truncated: usize,
) -> DepthResults {
    let samples = latencies.len();
    if samples == 0 {
        return DepthResults {
            depth,
            samples,
            avg_latency_ms: 0.0,
            p50_latency_ms: 0.0,
            p95_latency_ms: 0.0,
            stddev_latency_ms: 0.0,
            avg_nodes: 0.0,
            avg_edges: 0.0,
            truncated_ratio: 0.0,
        };
    }

    latencies.sort_by(|a, b| a.total_cmp(b));

    let stddev = if samples > 1 {
        statistical::standard_deviation(&latencies, None)
    } else {
        0.0
    };

    DepthResults {
        depth,
        samples,
        avg_latency_ms: statistical::mean(&latencies),
        p50_latency_ms: percentile(&latencies, 50),
        p95_latency_ms: percentile(&latencies, 95),
        stddev_latency_ms: stddev,
        avg_nodes: nodes as f64 / samples as f64,
        avg_edges: edges as f64 / samples as f64,
        truncated_ratio: truncated as f64 / samples as f64,
    }
}

fn percentile(sorted_data: &[f64], p: usize) -> f64 {
    let index = (p as f64 / 100.0 * sorted_data.len() as f64) as usize;
    sorted_data[index.min(sorted_data.len() - 1)]
}
