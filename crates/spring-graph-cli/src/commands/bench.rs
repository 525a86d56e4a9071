//! Empirical complexity benchmark: brute force vs Barnes-Hut.
//!
//! Both strategies run the same seeded graph and the same seeded initial
//! scatter, so the timing difference is purely the repulsion hot path.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use spring_graph_core::Graph;
use spring_graph_layout::{BarnesHut, BruteForce, LayoutEngine};

use super::layout::format_duration;

/// Parameters for one benchmark sweep.
pub struct BenchOptions {
    pub sizes: Vec<usize>,
    pub target_degree: f64,
    pub iterations: usize,
    pub width: f32,
    pub height: f32,
    pub init_temp: f32,
    pub cooling: f32,
    pub theta: f32,
    pub graph_seed: u64,
    pub layout_seed: u64,
    pub output: PathBuf,
}

struct BenchResult {
    n: usize,
    brute_force_ms: f64,
    barnes_hut_ms: f64,
}

/// Execute the benchmark sweep and write benchmark.csv.
pub fn execute(opts: &BenchOptions) -> Result<()> {
    println!("Fruchterman-Reingold complexity benchmark");
    println!("=========================================");
    println!("iterations per run : {}", opts.iterations);
    println!("Barnes-Hut theta   : {}", opts.theta);
    println!("target avg degree  : {}", opts.target_degree);
    println!();
    println!(
        "{:<8} {:<20} {:<20} speedup",
        "N", "BruteForce (ms)", "BarnesHut (ms)"
    );
    println!("{}", "-".repeat(60));

    let mut results = Vec::with_capacity(opts.sizes.len());
    let started = Instant::now();

    for &n in &opts.sizes {
        // Sparse, realistic graphs: p scales inversely with N.
        let p = (opts.target_degree / n as f64).min(1.0);
        let graph = Graph::erdos_renyi(n, p, Some(opts.graph_seed))?;

        let brute_force_ms = measure_ms(&graph, opts, false)?;
        let barnes_hut_ms = measure_ms(&graph, opts, true)?;

        let speedup = if barnes_hut_ms > 0.0 {
            brute_force_ms / barnes_hut_ms
        } else {
            0.0
        };
        println!("{n:<8} {brute_force_ms:<20.2} {barnes_hut_ms:<20.2} {speedup:.1}x");

        results.push(BenchResult {
            n,
            brute_force_ms,
            barnes_hut_ms,
        });
    }

    let path = write_csv(&results, &opts.output)?;
    println!();
    println!("total time : {}", format_duration(started.elapsed()));
    println!("results    : {}", path.display());
    Ok(())
}

/// Times `iterations` steps of a fresh engine over a clone of `graph`.
fn measure_ms(graph: &Graph, opts: &BenchOptions, barnes_hut: bool) -> Result<f64> {
    let mut g = graph.clone();

    let mut engine = LayoutEngine::new(opts.width, opts.height, 1.0)?;
    engine.set_temperature(opts.init_temp);
    engine.set_cooling_rate(opts.cooling);
    if barnes_hut {
        engine.set_repulsive_strategy(Box::new(BarnesHut::new(opts.theta)));
    } else {
        engine.set_repulsive_strategy(Box::new(BruteForce));
    }
    engine.initialize(&mut g, Some(opts.layout_seed))?;

    let t0 = Instant::now();
    for _ in 0..opts.iterations {
        engine.step(&mut g)?;
    }
    Ok(t0.elapsed().as_secs_f64() * 1000.0)
}

fn write_csv(results: &[BenchResult], output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create output directory {}", output_dir.display()))?;

    let mut csv = String::from("N,BruteForce_ms,BarnesHut_ms\n");
    for r in results {
        csv.push_str(&format!(
            "{},{:.4},{:.4}\n",
            r.n, r.brute_force_ms, r.barnes_hut_ms
        ));
    }

    let path = output_dir.join("benchmark.csv");
    std::fs::write(&path, csv).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(path)
}
