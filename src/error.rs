//! Error types for plate configuration and solver setup.

use thiserror::Error;

/// Crate result type alias.
pub type Result<T> = std::result::Result<T, PlateError>;

/// Everything that can go wrong before the relaxation loop starts.
///
/// The loop itself has no failure path.
#[derive(Error, Debug)]
pub enum PlateError {
    /// The grid has no interior cell.
    #[error("grid must be at least 3x3, got {rows}x{cols}")]
    GridTooSmall { rows: usize, cols: usize },

    /// The two temperature fields cannot be addressed on this platform.
    #[error("grid of {rows}x{cols} cells is too large to allocate")]
    GridTooLarge { rows: usize, cols: usize },

    /// Tolerance is negative or NaN.
    #[error("tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),

    /// A fixed edge temperature is infinite or NaN.
    #[error("{edge} boundary temperature must be finite, got {value}")]
    NonFiniteBoundary { edge: &'static str, value: f64 },

    /// An edge temperature so large that the boundary sum or a stencil sum
    /// would overflow to infinity.
    #[error("{edge} boundary temperature {value} exceeds the magnitude limit {limit:e} for this grid")]
    BoundaryTooLarge {
        edge: &'static str,
        value: f64,
        limit: f64,
    },

    /// Zero worker threads requested.
    #[error("thread count must be at least 1")]
    ZeroThreads,

    /// An iteration cap of zero would never perform a sweep.
    #[error("iteration limit must be at least 1")]
    ZeroIterationLimit,

    /// The rayon worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
