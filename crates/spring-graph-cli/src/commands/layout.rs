//! Layout command implementation.
//!
//! Generates an Erdős–Rényi graph, anneals it and exports the result.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use spring_graph_core::Graph;
use spring_graph_layout::{BarnesHut, BruteForce, LayoutEngine};

/// Repulsive strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Exact O(|V|^2) pairwise repulsion.
    BruteForce,
    /// O(|V| log |V|) Barnes-Hut approximation.
    BarnesHut,
}

/// Parameters for one layout run.
pub struct LayoutOptions {
    pub vertices: usize,
    pub edge_prob: f64,
    pub width: f32,
    pub height: f32,
    pub scaling: f32,
    pub init_temp: f32,
    pub cooling: f32,
    pub theta: f32,
    pub iterations: usize,
    pub strategy: Strategy,
    pub graph_seed: u64,
    pub layout_seed: u64,
    pub output: PathBuf,
    pub json: bool,
}

#[derive(Serialize)]
struct NodeRecord {
    id: u32,
    x: f32,
    y: f32,
}

#[derive(Serialize)]
struct EdgeRecord {
    source: u32,
    target: u32,
}

/// JSON snapshot of a finished run, written when `--json` is passed.
#[derive(Serialize)]
struct LayoutSnapshot {
    vertex_count: usize,
    edge_count: usize,
    iterations: usize,
    optimal_distance: f32,
    final_kinetic_energy: f32,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

/// Execute the layout command end to end.
pub fn execute(opts: &LayoutOptions) -> Result<()> {
    println!(
        "[1/4] Generating Erdős–Rényi G({}, {}) ...",
        opts.vertices, opts.edge_prob
    );
    let mut graph = Graph::erdos_renyi(opts.vertices, opts.edge_prob, Some(opts.graph_seed))?;
    println!(
        "      |V| = {}   |E| = {}",
        graph.vertex_count(),
        graph.edge_count()
    );

    let strategy_label = match opts.strategy {
        Strategy::BruteForce => "brute-force".to_string(),
        Strategy::BarnesHut => format!("Barnes-Hut, theta = {}", opts.theta),
    };
    println!("[2/4] Initialising layout engine ({strategy_label}) ...");

    let mut engine = LayoutEngine::new(opts.width, opts.height, opts.scaling)?;
    engine.set_temperature(opts.init_temp);
    engine.set_cooling_rate(opts.cooling);
    if opts.strategy == Strategy::BarnesHut {
        engine.set_repulsive_strategy(Box::new(BarnesHut::new(opts.theta)));
    } else {
        engine.set_repulsive_strategy(Box::new(BruteForce));
    }
    engine.initialize(&mut graph, Some(opts.layout_seed))?;
    println!("      k = {:.3}", engine.optimal_distance());

    println!("[3/4] Running {} iterations ...", opts.iterations);
    let mut curve = Vec::with_capacity(opts.iterations);
    let started = Instant::now();

    for iter in 0..opts.iterations {
        engine.step(&mut graph)?;
        curve.push(engine.kinetic_energy());

        if (iter + 1) % 100 == 0 {
            println!(
                "  iter {:>5}  |  T = {:>10.4}  |  E_k = {:>12.4}  |  elapsed: {}",
                iter + 1,
                engine.temperature(),
                engine.kinetic_energy(),
                format_duration(started.elapsed())
            );
        }
    }

    let total = started.elapsed();
    info!(iterations = opts.iterations, ?total, "layout finished");
    println!(
        "      total {}   ({} per iteration)",
        format_duration(total),
        format_duration(total / opts.iterations.max(1) as u32)
    );

    println!("[4/4] Exporting results to '{}' ...", opts.output.display());
    let files = spring_graph_export::export_all(&graph, &curve, &opts.output)?;
    println!("  -> {}", files.nodes.display());
    println!("  -> {}", files.edges.display());
    println!("  -> {}", files.metrics.display());

    if opts.json {
        let path = write_snapshot(&graph, &engine, &curve, opts)?;
        println!("  -> {}", path.display());
    }

    Ok(())
}

fn write_snapshot(
    graph: &Graph,
    engine: &LayoutEngine,
    curve: &[f32],
    opts: &LayoutOptions,
) -> Result<PathBuf> {
    let snapshot = LayoutSnapshot {
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        iterations: curve.len(),
        optimal_distance: engine.optimal_distance(),
        final_kinetic_energy: engine.kinetic_energy(),
        nodes: graph
            .nodes()
            .iter()
            .map(|v| NodeRecord {
                id: v.id,
                x: v.position.x,
                y: v.position.y,
            })
            .collect(),
        edges: graph
            .edges()
            .map(|e| {
                let c = e.canonical();
                EdgeRecord {
                    source: c.source,
                    target: c.target,
                }
            })
            .collect(),
    };

    let path = opts.output.join("layout.json");
    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Formats a duration as a short human-readable string.
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms} ms")
    } else {
        format!("{:.2} s", d.as_secs_f64())
    }
}
