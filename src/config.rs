//! Run configuration.
//!
//! Grid size, tolerance, edge temperatures and threading were compile-time
//! constants in the classic formulation of this problem; here they are plain
//! values chosen per run.

use std::fmt;
use std::mem;

use clap::ValueEnum;

use crate::error::{PlateError, Result};

pub const DEFAULT_ROWS: usize = 500;
pub const DEFAULT_COLS: usize = 500;
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Fixed temperatures held on the four plate edges.
///
/// Corners belong to the north and south rows: the west and east columns only
/// cover rows `1..rows-1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryTemperatures {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Default for BoundaryTemperatures {
    fn default() -> Self {
        BoundaryTemperatures {
            north: 0.0,
            south: 100.0,
            east: 100.0,
            west: 100.0,
        }
    }
}

impl BoundaryTemperatures {
    /// Same temperature on every edge.
    pub fn uniform(value: f64) -> Self {
        BoundaryTemperatures {
            north: value,
            south: value,
            east: value,
            west: value,
        }
    }

    /// Largest edge magnitude a plate with `boundary_cells` perimeter cells
    /// accepts. Both the perimeter sum and every four-neighbour sum then stay
    /// well below `f64::MAX`.
    pub fn magnitude_limit(boundary_cells: usize) -> f64 {
        f64::MAX / (4.0 * boundary_cells.max(4) as f64)
    }

    fn validate(&self, boundary_cells: usize) -> Result<()> {
        let limit = Self::magnitude_limit(boundary_cells);
        let edges = [
            ("north", self.north),
            ("south", self.south),
            ("east", self.east),
            ("west", self.west),
        ];
        for (edge, value) in edges {
            if !value.is_finite() {
                return Err(PlateError::NonFiniteBoundary { edge, value });
            }
            if value.abs() > limit {
                return Err(PlateError::BoundaryTooLarge { edge, value, limit });
            }
        }
        Ok(())
    }
}

/// How the parallel regions of a sweep are executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One thread, plain loops. Reference for the parallel backends.
    Single,
    /// Rayon work-stealing pool with row-level parallelism.
    #[default]
    Rayon,
    /// Scoped std threads over fixed row bands; every region ends when all
    /// bands have joined.
    Scoped,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Single => "single",
            Backend::Rayon => "rayon",
            Backend::Scoped => "scoped",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlateConfig {
    pub rows: usize,
    pub cols: usize,
    pub tolerance: f64,
    pub boundary: BoundaryTemperatures,
    pub threads: usize,
    pub backend: Backend,
    /// `None` keeps relaxing until the tolerance is met, however long it takes.
    pub max_iterations: Option<u64>,
}

impl Default for PlateConfig {
    fn default() -> Self {
        PlateConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            tolerance: DEFAULT_TOLERANCE,
            boundary: BoundaryTemperatures::default(),
            threads: available_processors(),
            backend: Backend::default(),
            max_iterations: None,
        }
    }
}

impl PlateConfig {
    pub fn with_size(rows: usize, cols: usize) -> Self {
        PlateConfig {
            rows,
            cols,
            ..PlateConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows < 3 || self.cols < 3 {
            return Err(PlateError::GridTooSmall {
                rows: self.rows,
                cols: self.cols,
            });
        }
        // each field must fit in one allocation; 2r + 2c - 4 <= r * c from here on
        let fits = self
            .rows
            .checked_mul(self.cols)
            .and_then(|cells| cells.checked_mul(mem::size_of::<f64>()))
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(PlateError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(PlateError::InvalidTolerance(self.tolerance));
        }
        self.boundary.validate(2 * self.rows + 2 * self.cols - 4)?;
        if self.threads == 0 {
            return Err(PlateError::ZeroThreads);
        }
        if self.max_iterations == Some(0) {
            return Err(PlateError::ZeroIterationLimit);
        }
        Ok(())
    }
}

/// Number of processing units the platform reports, 1 when unknown.
pub fn available_processors() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
