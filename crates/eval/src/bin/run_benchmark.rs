use anyhow::Result;
use dataset::DatasetReader;
use eval::{Benchmarker, Profile, generate, generate_plots};
use index::GraphIndex;
use std::path::PathBuf;

const DEPTHS: [usize; 5] = [1, 2, 3, 4, 5];
const SAMPLES: usize = 200;
const MAX_NODES: usize = 2000;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let profile: Profile = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "dense".to_string())
        .parse()?;
    let seed: u64 = match std::env::args().nth(2) {
        Some(raw) => raw.parse()?,
        None => 42,
    };

    println!("=== Neighborhood Extraction Benchmark ({:?}, seed {}) ===\n", profile, seed);

    // Generate and keep the fixture
    let dataset = generate(profile, seed);
    let fixture = PathBuf::from(format!("data/{:?}.json", profile).to_lowercase());
    DatasetReader::write_file(&fixture, &dataset).await?;
    println!("Fixture written to {}", fixture.display());

    let index = GraphIndex::build(&dataset);
    let stats = index.stats();
    println!("Entities: {}  Links: {}\n", stats.entities, stats.unique_links);

    let results = Benchmarker::new(&index, MAX_NODES)
        .with_seed(seed)
        .run(&DEPTHS, SAMPLES);

    print_results(&results);

    // Save results
    let results_json = serde_json::to_string_pretty(&results)?;
    std::fs::write("benchmark_results.json", results_json)?;
    println!("\nResults saved to benchmark_results.json");

    generate_plots(&results, "plots")?;
    println!("Plots saved to plots/");

    Ok(())
}

fn print_results(results: &eval::BenchmarkResults) {
    println!("| Depth | Avg (ms) | P50 (ms) | P95 (ms) | Stddev | Nodes | Edges | Truncated |");
    println!("|-------|----------|----------|----------|--------|-------|-------|-----------|");
    for depth in &results.by_depth {
        println!(
            "| {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.1} | {:.1} | {:.0}% |",
            depth.depth,
            depth.avg_latency_ms,
            depth.p50_latency_ms,
            depth.p95_latency_ms,
            depth.stddev_latency_ms,
            depth.avg_nodes,
            depth.avg_edges,
            depth.truncated_ratio * 100.0,
        );
    }
}
