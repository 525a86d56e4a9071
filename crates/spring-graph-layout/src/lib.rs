//! Force-directed graph layout using the Fruchterman-Reingold algorithm.
//!
//! The engine runs one synchronous iteration per [`LayoutEngine::step`]:
//! repulsive forces between every node pair, attractive forces along edges,
//! then a temperature-clamped position update. Repulsion is pluggable via
//! [`RepulsiveStrategy`]:
//!
//! - [`BruteForce`]: the exact O(|V|²) pairwise reference.
//! - [`BarnesHut`]: O(|V| log |V|) multipole approximation backed by a
//!   pool-allocated region quadtree that is rebuilt (but not reallocated)
//!   every iteration.
//!
//! Both strategies share the same force formula and near-zero-distance
//! guard, so Barnes-Hut with `theta = 0` reproduces the brute-force result
//! up to floating-point summation order.

mod bounds;
mod engine;
mod error;
mod quadtree;
mod repulsion;

pub use bounds::BoundingBox;
pub use engine::LayoutEngine;
pub use error::{LayoutError, LayoutResult};
pub use quadtree::{Cell, QuadTree};
pub use repulsion::{BarnesHut, BruteForce, RepulsiveStrategy};

/// Distances below this are treated as coincident; the delta is replaced
/// by a fixed eastward nudge of the same magnitude.
pub const MIN_DISTANCE: f32 = 1e-4;

/// Displacements shorter than this are not applied at all.
pub const MIN_DISPLACEMENT: f32 = 1e-6;

/// Floor for the annealing temperature.
pub const MIN_TEMPERATURE: f32 = 1e-3;

/// Padding added to each side of the tight bounding box before a
/// Barnes-Hut tree build, so boundary points are strictly interior.
pub const BOUNDS_MARGIN: f32 = 1.0;

/// Standard Barnes-Hut acceptance threshold.
pub const DEFAULT_THETA: f32 = 0.5;
