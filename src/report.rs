//! Progress output. Reporters only display what the solver hands them and
//! never influence the run.

use std::fmt;
use std::io::{self, Write};

use tracing::warn;

use crate::config::Backend;
use crate::solver::{Solution, Status};

/// What a run is about to do.
#[derive(Clone, Debug, PartialEq)]
pub struct RunInfo {
    pub rows: usize,
    pub cols: usize,
    pub tolerance: f64,
    pub processors: usize,
    pub threads: usize,
    pub backend: Backend,
}

/// Receives run milestones. `progress` is only called on iterations
/// 1, 2, 4, 8, ...
pub trait ProgressReporter {
    fn started(&mut self, _info: &RunInfo) {}

    fn initialized(&mut self, _boundary_mean: f64) {}

    fn progress(&mut self, _iteration: u64, _max_difference: f64) {}

    fn finished(&mut self, _solution: &Solution) {}
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {}

/// Plain-text table in the classic layout.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    failed: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleReporter::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.failed {
            return;
        }
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.write_all(b"\n")) {
            warn!("progress output failed, further lines dropped: {}", e);
            self.failed = true;
        }
    }
}

impl<W: Write> ProgressReporter for ConsoleReporter<W> {
    fn started(&mut self, info: &RunInfo) {
        self.line(format_args!(""));
        self.line(format_args!(
            "The iteration will be repeated until the change is <= {}",
            c_exponent(info.tolerance)
        ));
        self.line(format_args!(
            "Number of processors available = {}",
            info.processors
        ));
        self.line(format_args!("Number of threads =              {}", info.threads));
    }

    fn initialized(&mut self, boundary_mean: f64) {
        self.line(format_args!(""));
        self.line(format_args!("Average = {:.6}", boundary_mean));
        self.line(format_args!(""));
        self.line(format_args!("Iteration  Change"));
        self.line(format_args!(""));
    }

    fn progress(&mut self, iteration: u64, max_difference: f64) {
        self.line(format_args!("  {:>8}  {:.6}", iteration, max_difference));
    }

    fn finished(&mut self, solution: &Solution) {
        self.line(format_args!(""));
        self.line(format_args!(
            "  {:>8}  {:.6}",
            solution.iterations, solution.max_difference
        ));
        self.line(format_args!(""));
        match solution.status {
            Status::Converged => self.line(format_args!("Error tolerance achieved.")),
            Status::IterationLimit => {
                self.line(format_args!("Iteration limit reached before tolerance."))
            }
        }
        self.line(format_args!(
            "Wallclock time = {:.6}",
            solution.elapsed.as_secs_f64()
        ));
        if let Err(e) = self.out.flush() {
            warn!("flushing progress output failed: {}", e);
        }
    }
}

/// `1.000000e-03` style: six mantissa digits, signed two-digit exponent.
pub fn c_exponent(value: f64) -> String {
    let formatted = format!("{:.6e}", value);
    if let Some((mantissa, exponent)) = formatted.split_once('e') {
        if let Ok(exp) = exponent.parse::<i32>() {
            let sign = if exp < 0 { '-' } else { '+' };
            return format!("{}e{}{:02}", mantissa, sign, exp.abs());
        }
    }
    formatted
}
