//! Steady-state temperature distribution over a rectangular plate.
//!
//! The plate is discretized into a `rows x cols` grid with fixed (Dirichlet)
//! edge temperatures. The interior is relaxed with the five-point Jacobi
//! stencil until no cell moves by more than the configured tolerance between
//! two sweeps.
//!
//! ```no_run
//! use heat_plate::config::PlateConfig;
//! use heat_plate::report::NullReporter;
//! use heat_plate::solver::PlateSolver;
//!
//! let config = PlateConfig::default();
//! let mut solver = PlateSolver::new(config).unwrap();
//! let solution = solver.run(&mut NullReporter);
//! println!("converged after {} sweeps", solution.iterations);
//! ```

pub mod boundary;
pub mod config;
pub mod convergence;
pub mod error;
pub mod grid;
pub mod implementations;
pub mod report;
pub mod solver;

pub use config::{Backend, BoundaryTemperatures, PlateConfig};
pub use error::{PlateError, Result};
pub use solver::{PlateSolver, Solution, Status};
