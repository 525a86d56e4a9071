//! Error types for layout operations.

use thiserror::Error;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur while configuring or stepping a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Frame extents must be positive, finite numbers.
    #[error("frame extents must be positive and finite, got {width} x {height}")]
    InvalidFrame { width: f32, height: f32 },

    /// The scaling constant C must be positive and finite.
    #[error("scaling constant must be positive and finite, got {0}")]
    InvalidScaling(f32),

    /// Layout requires at least one vertex.
    #[error("graph has no vertices")]
    EmptyGraph,

    /// A point was inserted outside the quadtree root bounds. This is a
    /// caller bug, not a recoverable condition.
    #[error("point ({x}, {y}) lies outside the quadtree bounds")]
    OutOfBounds { x: f32, y: f32 },

    /// A step produced a non-finite displacement; node positions were left
    /// exactly as they were when the step began.
    #[error("non-finite displacement for node {node}; step aborted, positions unchanged")]
    NonFinite { node: u32 },
}
