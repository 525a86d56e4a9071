//! spring-graph CLI - force-directed graph layout runs and benchmarks.
//!
//! `sg layout` generates a random graph, anneals it with the
//! Fruchterman-Reingold engine and exports CSVs for plotting;
//! `sg bench` times the brute-force strategy against Barnes-Hut over a
//! sweep of graph sizes.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::bench::{self, BenchOptions};
use commands::layout::{self, LayoutOptions, Strategy};

/// spring-graph: Fruchterman-Reingold graph layout.
#[derive(Parser, Debug)]
#[command(
    name = "sg",
    author,
    version,
    about = "spring-graph: force-directed graph layout",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Erdős–Rényi graph, run the layout, export CSVs.
    ///
    /// Writes nodes.csv, edges.csv and metrics.csv into the output
    /// directory; pass --json for an additional layout.json snapshot.
    Layout {
        /// Number of vertices.
        #[arg(long, default_value_t = 1000)]
        vertices: usize,

        /// Edge probability in [0, 1].
        #[arg(long, default_value_t = 0.02)]
        edge_prob: f64,

        /// Frame width.
        #[arg(long, default_value_t = 1920.0)]
        width: f32,

        /// Frame height.
        #[arg(long, default_value_t = 1080.0)]
        height: f32,

        /// Scaling constant C in k = C * sqrt(area / |V|).
        #[arg(long, default_value_t = 1.0)]
        scaling: f32,

        /// Initial annealing temperature.
        #[arg(long, default_value_t = 200.0)]
        init_temp: f32,

        /// Multiplicative cooling rate per iteration.
        #[arg(long, default_value_t = 0.95)]
        cooling: f32,

        /// Barnes-Hut acceptance threshold (0 = exact, 0.5 = standard).
        #[arg(long, default_value_t = 0.5)]
        theta: f32,

        /// Number of layout iterations.
        #[arg(long, default_value_t = 500)]
        iterations: usize,

        /// Repulsive strategy.
        #[arg(long, value_enum, default_value = "barnes-hut")]
        strategy: Strategy,

        /// Seed for the graph generator.
        #[arg(long, default_value_t = 42)]
        graph_seed: u64,

        /// Seed for the initial node scatter.
        #[arg(long, default_value_t = 7)]
        layout_seed: u64,

        /// Output directory for the CSV files.
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Also write a layout.json snapshot of the final state.
        #[arg(long)]
        json: bool,
    },

    /// Time brute-force against Barnes-Hut over a sweep of graph sizes.
    ///
    /// Prints a speedup table and writes benchmark.csv.
    Bench {
        /// Vertex counts to sweep.
        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = vec![100, 250, 500, 750, 1000, 1500, 2000, 3000, 4000, 5000]
        )]
        sizes: Vec<usize>,

        /// Target average degree; p = min(degree / N, 1).
        #[arg(long, default_value_t = 5.0)]
        target_degree: f64,

        /// Iterations per timed run.
        #[arg(long, default_value_t = 50)]
        iterations: usize,

        /// Frame width.
        #[arg(long, default_value_t = 1920.0)]
        width: f32,

        /// Frame height.
        #[arg(long, default_value_t = 1080.0)]
        height: f32,

        /// Initial annealing temperature.
        #[arg(long, default_value_t = 200.0)]
        init_temp: f32,

        /// Multiplicative cooling rate per iteration.
        #[arg(long, default_value_t = 0.95)]
        cooling: f32,

        /// Barnes-Hut acceptance threshold.
        #[arg(long, default_value_t = 0.5)]
        theta: f32,

        /// Seed for the graph generator.
        #[arg(long, default_value_t = 42)]
        graph_seed: u64,

        /// Seed for the initial node scatter.
        #[arg(long, default_value_t = 7)]
        layout_seed: u64,

        /// Output directory for benchmark.csv.
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    // Prefer RUST_LOG if set; otherwise fall back to CLI verbosity.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<EnvFilter>().ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()));

    // Logs go to stderr; stdout is reserved for the progress report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Layout {
            vertices,
            edge_prob,
            width,
            height,
            scaling,
            init_temp,
            cooling,
            theta,
            iterations,
            strategy,
            graph_seed,
            layout_seed,
            output,
            json,
        } => layout::execute(&LayoutOptions {
            vertices,
            edge_prob,
            width,
            height,
            scaling,
            init_temp,
            cooling,
            theta,
            iterations,
            strategy,
            graph_seed,
            layout_seed,
            output,
            json,
        }),

        Commands::Bench {
            sizes,
            target_degree,
            iterations,
            width,
            height,
            init_temp,
            cooling,
            theta,
            graph_seed,
            layout_seed,
            output,
        } => bench::execute(&BenchOptions {
            sizes,
            target_degree,
            iterations,
            width,
            height,
            init_temp,
            cooling,
            theta,
            graph_seed,
            layout_seed,
            output,
        }),
    }
}
