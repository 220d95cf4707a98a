//! Execution backends for the parallel regions of a run.
//!
//! Every backend performs the same arithmetic on the same cells in the same
//! per-cell order, so the relaxed field does not depend on the backend or on
//! the thread count. Only the way rows are handed out to threads differs.

pub mod rayon_pool;
pub mod scoped;
pub mod single;

use tracing::debug;

use crate::config::{Backend, BoundaryTemperatures, PlateConfig};
use crate::error::Result;
use crate::grid::Grid;

pub use rayon_pool::RayonBackend;
pub use scoped::ScopedBackend;
pub use single::SingleBackend;

/// The parallel regions of one run. Each call returns only after all of its
/// work is done, which is the barrier between phases.
pub trait SweepBackend: Send + Sync {
    fn kind(&self) -> Backend;

    /// Worker threads actually used.
    fn threads(&self) -> usize;

    /// Writes the fixed edges into `current` and returns their mean.
    fn initialize_boundary(&self, grid: &mut Grid, temps: &BoundaryTemperatures) -> f64;

    /// Fills every interior cell of `current` with `mean`.
    fn seed_interior(&self, grid: &mut Grid, mean: f64);

    /// Copies all of `current` into `previous`.
    fn snapshot(&self, grid: &mut Grid);

    /// One Jacobi sweep: every interior cell of `current` becomes the mean of
    /// its four neighbours in `previous`.
    fn relax(&self, grid: &mut Grid);

    /// Largest `|current - previous|` over the interior.
    fn max_difference(&self, grid: &Grid) -> f64;
}

pub fn build(config: &PlateConfig) -> Result<Box<dyn SweepBackend>> {
    let backend: Box<dyn SweepBackend> = match config.backend {
        Backend::Single => Box::new(SingleBackend),
        Backend::Rayon => Box::new(RayonBackend::new(config.threads)?),
        Backend::Scoped => Box::new(ScopedBackend::new(config.threads)),
    };
    debug!(
        backend = %backend.kind(),
        threads = backend.threads(),
        "execution backend ready"
    );
    Ok(backend)
}

/// Five-point update of interior row `i`, reading the whole `src` field and
/// writing the matching row of the destination.
#[inline]
pub(crate) fn relax_row(src: &[f64], dst_row: &mut [f64], i: usize, cols: usize) {
    for j in 1..cols - 1 {
        let idx = i * cols + j;
        dst_row[j] = (src[idx - cols] + src[idx + cols] + src[idx - 1] + src[idx + 1]) / 4.0;
    }
}

/// Largest absolute change across the interior columns of one row.
#[inline]
pub(crate) fn row_max_difference(current_row: &[f64], previous_row: &[f64]) -> f64 {
    let cols = current_row.len();
    let mut local = 0.0;
    for j in 1..cols - 1 {
        let diff = (current_row[j] - previous_row[j]).abs();
        if local < diff {
            local = diff;
        }
    }
    local
}

/// Rows per thread when `rows` rows are shared by `threads` threads.
#[inline]
pub(crate) fn band_rows(rows: usize, threads: usize) -> usize {
    rows.div_ceil(threads.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relax_row_averages_neighbours() {
        // 3x3, only (1,1) is interior
        let src = [0.0, 1.0, 0.0, 2.0, 99.0, 3.0, 0.0, 4.0, 0.0];
        let mut row = [7.0, 7.0, 7.0];
        relax_row(&src, &mut row, 1, 3);
        assert_eq!(row, [7.0, 2.5, 7.0]);
    }

    #[test]
    fn row_difference_ignores_edge_columns() {
        let current = [100.0, 1.0, 3.0, -50.0];
        let previous = [0.0, 2.0, 1.0, 50.0];
        assert_eq!(row_max_difference(&current, &previous), 2.0);
    }

    #[test]
    fn bands_cover_all_rows() {
        assert_eq!(band_rows(10, 3), 4);
        assert_eq!(band_rows(2, 8), 1);
        assert_eq!(band_rows(12, 4), 3);
        assert_eq!(band_rows(1, 1), 1);
    }

    #[test]
    fn build_reports_thread_counts() {
        let mut config = PlateConfig::with_size(5, 5);
        config.threads = 3;

        config.backend = Backend::Single;
        assert_eq!(build(&config).unwrap().threads(), 1);

        config.backend = Backend::Rayon;
        let backend = build(&config).unwrap();
        assert_eq!(backend.kind(), Backend::Rayon);
        assert_eq!(backend.threads(), 3);

        config.backend = Backend::Scoped;
        assert_eq!(build(&config).unwrap().threads(), 3);
    }
}
