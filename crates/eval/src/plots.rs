use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::benchmark::BenchmarkResults;

pub fn generate_plots(results: &BenchmarkResults, output_dir: &str) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .context(format!("Failed to create {}", output_dir))?;

    if results.by_depth.is_empty() {
        return Ok(());
    }

    // Plot 1: Latency per depth
    plot_latency_by_depth(results, &format!("{}/latency_by_depth.png", output_dir))?;

    // Plot 2: Subgraph size per depth
    plot_size_by_depth(results, &format!("{}/size_by_depth.png", output_dir))?;

    Ok(())
}

fn plot_latency_by_depth(results: &BenchmarkResults, path: &str) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let depths = results.by_depth.len() as f64;
    let max_latency = results
        .by_depth
        .iter()
        .map(|d| d.p95_latency_ms)
        .fold(0.0f64, f64::max)
        .max(0.001);

    let mut chart = ChartBuilder::on(&root)
        .caption("Extraction latency by depth (ms)", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..depths, 0f64..(max_latency * 1.2))?;

    chart.configure_mesh()
        .x_desc("Depth")
        .y_desc("Latency (ms)")
        .draw()?;

    for (i, depth) in results.by_depth.iter().enumerate() {
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new([
            (x + 0.15, 0.0),
            (x + 0.45, depth.avg_latency_ms),
        ], BLUE.filled())))?;
        chart.draw_series(std::iter::once(Rectangle::new([
            (x + 0.55, 0.0),
            (x + 0.85, depth.p95_latency_ms),
        ], RED.filled())))?;
    }

    root.present()?;
    println!("Saved latency plot to {}", path);
    Ok(())
}

fn plot_size_by_depth(results: &BenchmarkResults, path: &str) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_depth = results.by_depth.iter().map(|d| d.depth).max().unwrap_or(1) as f64;
    let max_size = results
        .by_depth
        .iter()
        .map(|d| d.avg_edges.max(d.avg_nodes))
        .fold(1.0f64, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption("Average subgraph size by depth", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(max_depth + 1.0), 0f64..(max_size * 1.2))?;

    chart.configure_mesh()
        .x_desc("Depth")
        .draw()?;

    chart.draw_series(LineSeries::new(
        results.by_depth.iter().map(|d| (d.depth as f64, d.avg_nodes)),
        &BLUE,
    ))?
    .label("nodes")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart.draw_series(LineSeries::new(
        results.by_depth.iter().map(|d| (d.depth as f64, d.avg_edges)),
        &GREEN,
    ))?
    .label("edges")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Saved size plot to {}", path);
    Ok(())
}
