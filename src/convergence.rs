//! Deciding when to stop relaxing, and when to say so.

/// Why the relaxation loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The last sweep moved no interior cell by more than the tolerance.
    Converged,
    /// The optional iteration cap was hit first.
    IterationLimit,
}

/// Counts sweeps and compares each sweep's max difference to the tolerance.
///
/// Only differences measured after a sweep are ever recorded; the seeded
/// state is never checked on its own.
#[derive(Clone, Debug)]
pub struct ConvergenceTracker {
    tolerance: f64,
    max_iterations: Option<u64>,
    iterations: u64,
    max_difference: f64,
}

impl ConvergenceTracker {
    pub fn new(tolerance: f64, max_iterations: Option<u64>) -> Self {
        ConvergenceTracker {
            tolerance,
            max_iterations,
            iterations: 0,
            max_difference: f64::INFINITY,
        }
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Difference recorded for the latest sweep, infinite before the first.
    pub fn max_difference(&self) -> f64 {
        self.max_difference
    }

    pub fn is_within_tolerance(&self, difference: f64) -> bool {
        difference <= self.tolerance
    }

    /// Records one completed sweep. Returns `Some` once the loop should stop.
    pub fn record(&mut self, difference: f64) -> Option<Status> {
        self.iterations += 1;
        self.max_difference = difference;

        if self.is_within_tolerance(difference) {
            Some(Status::Converged)
        } else if self
            .max_iterations
            .is_some_and(|limit| self.iterations >= limit)
        {
            Some(Status::IterationLimit)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.iterations = 0;
        self.max_difference = f64::INFINITY;
    }
}

/// Fires on iterations 1, 2, 4, 8, ...
#[derive(Clone, Debug)]
pub struct ReportCadence {
    next: u64,
}

impl Default for ReportCadence {
    fn default() -> Self {
        ReportCadence { next: 1 }
    }
}

impl ReportCadence {
    pub fn is_due(&mut self, iteration: u64) -> bool {
        if iteration == self.next {
            self.next = self.next.saturating_mul(2);
            true
        } else {
            false
        }
    }
}
