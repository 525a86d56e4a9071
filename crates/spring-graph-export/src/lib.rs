//! CSV export of graph layouts for downstream analysis.
//!
//! Three files, one concern each:
//!
//! - `nodes.csv`: `node_id,x,y`, final positions.
//! - `edges.csv`: `source,target`, one row per undirected edge in
//!   canonical (min, max) order.
//! - `metrics.csv`: `iteration,kinetic_energy`, the convergence curve.
//!
//! Floats are written with 6-decimal fixed precision. The output
//! directory is created on demand; any I/O failure surfaces with the
//! offending path attached.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use spring_graph_core::Graph;
use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while writing export files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A CSV file could not be created or written.
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Paths of the files produced by [`export_all`].
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub metrics: PathBuf,
}

/// Writes final node positions to `nodes.csv` in the given directory.
pub fn export_nodes(graph: &Graph, output_dir: &Path) -> ExportResult<PathBuf> {
    let path = ensure_dir(output_dir)?.join("nodes.csv");
    let mut file = open(&path)?;

    write_line(&path, &mut file, "node_id,x,y")?;
    for v in graph.nodes() {
        write_line(
            &path,
            &mut file,
            &format!("{},{:.6},{:.6}", v.id, v.position.x, v.position.y),
        )?;
    }
    finish(&path, file)?;
    Ok(path)
}

/// Writes the edge list to `edges.csv`, each undirected edge once in
/// canonical order.
pub fn export_edges(graph: &Graph, output_dir: &Path) -> ExportResult<PathBuf> {
    let path = ensure_dir(output_dir)?.join("edges.csv");
    let mut file = open(&path)?;

    write_line(&path, &mut file, "source,target")?;
    for e in graph.edges() {
        let c = e.canonical();
        write_line(&path, &mut file, &format!("{},{}", c.source, c.target))?;
    }
    finish(&path, file)?;
    Ok(path)
}

/// Writes the per-iteration kinetic energy curve to `metrics.csv`; the
/// row index is the iteration number.
pub fn export_metrics(curve: &[f32], output_dir: &Path) -> ExportResult<PathBuf> {
    let path = ensure_dir(output_dir)?.join("metrics.csv");
    let mut file = open(&path)?;

    write_line(&path, &mut file, "iteration,kinetic_energy")?;
    for (iteration, energy) in curve.iter().enumerate() {
        write_line(&path, &mut file, &format!("{},{:.6}", iteration, energy))?;
    }
    finish(&path, file)?;
    Ok(path)
}

/// Convenience: exports nodes, edges and metrics in one call.
pub fn export_all(graph: &Graph, curve: &[f32], output_dir: &Path) -> ExportResult<ExportedFiles> {
    Ok(ExportedFiles {
        nodes: export_nodes(graph, output_dir)?,
        edges: export_edges(graph, output_dir)?,
        metrics: export_metrics(curve, output_dir)?,
    })
}

fn ensure_dir(dir: &Path) -> ExportResult<&Path> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(dir)
}

fn open(path: &Path) -> ExportResult<BufWriter<File>> {
    let file = File::create(path).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

fn write_line(path: &Path, file: &mut BufWriter<File>, line: &str) -> ExportResult<()> {
    writeln!(file, "{line}").map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn finish(path: &Path, mut file: BufWriter<File>) -> ExportResult<()> {
    file.flush().map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
