//! heat-plate: steady-state temperature of a rectangular plate.
//!
//! ```bash
//! # reference run: 500x500, north edge 0, other edges 100, tolerance 0.001
//! heat-plate
//!
//! # smaller plate on four scoped threads
//! heat-plate --rows 120 --cols 80 --threads 4 --backend scoped
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use heat_plate::config::{
    available_processors, Backend, BoundaryTemperatures, PlateConfig, DEFAULT_COLS, DEFAULT_ROWS,
    DEFAULT_TOLERANCE,
};
use heat_plate::report::ConsoleReporter;
use heat_plate::solver::{PlateSolver, Status};

/// Exit code when the iteration cap stops the run before the tolerance.
const EXIT_ITERATION_LIMIT: u8 = 2;

/// Parallel Jacobi solver for the steady-state heat equation on a plate
#[derive(Parser, Debug)]
#[command(name = "heat-plate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid rows (north to south), at least 3
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Grid columns (west to east), at least 3
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// Stop once no interior cell changes by more than this between sweeps
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// North edge temperature
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    north: f64,

    /// South edge temperature
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    south: f64,

    /// East edge temperature
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    east: f64,

    /// West edge temperature
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    west: f64,

    /// Worker threads (default: available processors)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// How parallel regions are executed
    #[arg(short, long, value_enum, default_value_t = Backend::Rayon)]
    backend: Backend,

    /// Give up after this many sweeps (default: no limit)
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Enable debug diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Only report errors on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> PlateConfig {
        PlateConfig {
            rows: self.rows,
            cols: self.cols,
            tolerance: self.tolerance,
            boundary: BoundaryTemperatures {
                north: self.north,
                south: self.south,
                east: self.east,
                west: self.west,
            },
            threads: self.threads.unwrap_or_else(available_processors),
            backend: self.backend,
            max_iterations: self.max_iterations,
        }
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let mut solver = match PlateSolver::new(cli.config()) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let solution = solver.run(&mut ConsoleReporter::stdout());

    match solution.status {
        Status::Converged => ExitCode::SUCCESS,
        Status::IterationLimit => ExitCode::from(EXIT_ITERATION_LIMIT),
    }
}
