//! The relaxation loop.
//!
//! A run is: write the edges, seed the interior with the edge mean, then
//! repeat {snapshot `current` into `previous`, Jacobi sweep, measure the
//! largest change} until that change is within the tolerance.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{available_processors, PlateConfig};
use crate::convergence::{ConvergenceTracker, ReportCadence};
use crate::error::Result;
use crate::grid::Grid;
use crate::implementations::{self, SweepBackend};
use crate::report::{ProgressReporter, RunInfo};

pub use crate::convergence::Status;

/// Outcome of [`PlateSolver::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Sweeps performed, the final one included.
    pub iterations: u64,
    /// Largest interior change measured on the final sweep.
    pub max_difference: f64,
    pub boundary_mean: f64,
    /// Time spent in the sweep loop; initialization is not counted.
    pub elapsed: Duration,
    pub status: Status,
}

impl Solution {
    pub fn converged(&self) -> bool {
        self.status == Status::Converged
    }
}

pub struct PlateSolver {
    config: PlateConfig,
    grid: Grid,
    backend: Box<dyn SweepBackend>,
    tracker: ConvergenceTracker,
    boundary_mean: Option<f64>,
}

impl PlateSolver {
    /// Validates `config`, starts the backend and allocates both fields.
    pub fn new(config: PlateConfig) -> Result<Self> {
        config.validate()?;
        let backend = implementations::build(&config)?;
        let grid = Grid::new(config.rows, config.cols);
        let tracker = ConvergenceTracker::new(config.tolerance, config.max_iterations);

        Ok(PlateSolver {
            config,
            grid,
            backend,
            tracker,
            boundary_mean: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn threads(&self) -> usize {
        self.backend.threads()
    }

    /// Edge mean from the last [`initialize`](Self::initialize), if any.
    pub fn boundary_mean(&self) -> Option<f64> {
        self.boundary_mean
    }

    pub fn run_info(&self) -> RunInfo {
        RunInfo {
            rows: self.config.rows,
            cols: self.config.cols,
            tolerance: self.config.tolerance,
            processors: available_processors(),
            threads: self.backend.threads(),
            backend: self.backend.kind(),
        }
    }

    /// Writes the edges, seeds the interior and returns the edge mean.
    pub fn initialize(&mut self) -> f64 {
        let mean = self
            .backend
            .initialize_boundary(&mut self.grid, &self.config.boundary);
        self.backend.seed_interior(&mut self.grid, mean);
        self.tracker.reset();
        self.boundary_mean = Some(mean);
        mean
    }

    /// One full sweep. Returns the largest interior change it caused.
    pub fn sweep(&mut self) -> f64 {
        self.backend.snapshot(&mut self.grid);
        self.backend.relax(&mut self.grid);
        self.backend.max_difference(&self.grid)
    }

    /// Initializes and sweeps until the tolerance (or the optional cap) is
    /// reached. Without a cap, a tolerance the arithmetic can never meet
    /// keeps this loop running forever.
    pub fn run(&mut self, reporter: &mut dyn ProgressReporter) -> Solution {
        let info = self.run_info();
        info!(
            rows = info.rows,
            cols = info.cols,
            tolerance = info.tolerance,
            threads = info.threads,
            backend = %info.backend,
            "starting relaxation"
        );
        reporter.started(&info);

        let boundary_mean = self.initialize();
        debug!(boundary_mean, "plate initialized");
        reporter.initialized(boundary_mean);

        let mut cadence = ReportCadence::default();
        let start = Instant::now();

        let status = loop {
            let difference = self.sweep();
            let outcome = self.tracker.record(difference);
            let iteration = self.tracker.iterations();

            if cadence.is_due(iteration) {
                debug!(iteration, max_difference = difference, "sweep");
                reporter.progress(iteration, difference);
            }
            if let Some(status) = outcome {
                break status;
            }
        };

        let solution = Solution {
            iterations: self.tracker.iterations(),
            max_difference: self.tracker.max_difference(),
            boundary_mean,
            elapsed: start.elapsed(),
            status,
        };

        match status {
            Status::Converged => info!(
                iterations = solution.iterations,
                max_difference = solution.max_difference,
                elapsed_secs = solution.elapsed.as_secs_f64(),
                "tolerance reached"
            ),
            Status::IterationLimit => warn!(
                iterations = solution.iterations,
                max_difference = solution.max_difference,
                tolerance = self.config.tolerance,
                "iteration limit reached before tolerance"
            ),
        }

        reporter.finished(&solution);
        solution
    }
}

/// Builds a solver for `config` and runs it to completion.
pub fn solve(config: PlateConfig, reporter: &mut dyn ProgressReporter) -> Result<(Solution, Grid)> {
    let mut solver = PlateSolver::new(config)?;
    let solution = solver.run(reporter);
    Ok((solution, solver.into_grid()))
}
