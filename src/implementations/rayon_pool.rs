use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::boundary::fold_boundary_sum;
use crate::config::{Backend, BoundaryTemperatures};
use crate::error::Result;
use crate::grid::Grid;

use super::{relax_row, row_max_difference, SweepBackend};

/// Row-level parallelism on a dedicated rayon pool.
///
/// Writes are split with `par_chunks_mut(cols)`, so each worker owns whole
/// rows of the destination and no locking is needed. Reads during the sweep
/// only touch `previous`, which nobody writes in that phase.
pub struct RayonBackend {
    pool: ThreadPool,
}

impl RayonBackend {
    pub fn new(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("heat-plate-{i}"))
            .build()?;
        Ok(RayonBackend { pool })
    }
}

impl SweepBackend for RayonBackend {
    fn kind(&self) -> Backend {
        Backend::Rayon
    }

    fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn initialize_boundary(&self, grid: &mut Grid, temps: &BoundaryTemperatures) -> f64 {
        let rows = grid.rows();
        let cols = grid.cols();
        let count = grid.boundary_count() as f64;
        let data = grid.current_data_mut();

        let (north, rest) = data.split_at_mut(cols);
        let (middle, south) = rest.split_at_mut((rows - 2) * cols);

        self.pool.install(|| {
            rayon::join(
                || north.par_iter_mut().for_each(|cell| *cell = temps.north),
                || south.par_iter_mut().for_each(|cell| *cell = temps.south),
            );
            middle.par_chunks_mut(cols).for_each(|row| {
                row[0] = temps.west;
                row[cols - 1] = temps.east;
            });

            // Pairs are computed in parallel but collected in index order; only
            // the fold decides the rounding, and it runs in a fixed order.
            let sides: Vec<f64> = middle
                .par_chunks(cols)
                .map(|row| row[0] + row[cols - 1])
                .collect();
            let edges: Vec<f64> = south
                .par_iter()
                .zip(north.par_iter())
                .map(|(s, n)| s + n)
                .collect();

            fold_boundary_sum(sides, edges) / count
        })
    }

    fn seed_interior(&self, grid: &mut Grid, mean: f64) {
        let rows = grid.rows();
        let cols = grid.cols();
        let interior = &mut grid.current_data_mut()[cols..(rows - 1) * cols];

        self.pool.install(|| {
            interior
                .par_chunks_mut(cols)
                .for_each(|row| row[1..cols - 1].fill(mean));
        });
    }

    fn snapshot(&self, grid: &mut Grid) {
        let cols = grid.cols();
        let (previous, current) = grid.snapshot_buffers();

        self.pool.install(|| {
            previous
                .par_chunks_mut(cols)
                .zip(current.par_chunks(cols))
                .for_each(|(dst, src)| dst.copy_from_slice(src));
        });
    }

    fn relax(&self, grid: &mut Grid) {
        let rows = grid.rows();
        let cols = grid.cols();
        let (src, dst) = grid.stencil_buffers();

        // rows 1..rows-1 only; boundary rows stay out of the split
        let interior_dst = &mut dst[cols..(rows - 1) * cols];

        self.pool.install(|| {
            interior_dst
                .par_chunks_mut(cols)
                .enumerate()
                .for_each(|(r, dst_row)| relax_row(src, dst_row, r + 1, cols));
        });
    }

    fn max_difference(&self, grid: &Grid) -> f64 {
        let rows = grid.rows();
        let cols = grid.cols();
        let interior = cols..(rows - 1) * cols;
        let current = &grid.current_data()[interior.clone()];
        let previous = &grid.previous_data()[interior];

        // Non-negative f64 values order the same as their bit patterns, so the
        // per-worker partials can be merged with an integer fetch_max.
        let shared = AtomicU64::new(0.0f64.to_bits());

        self.pool.install(|| {
            current
                .par_chunks(cols)
                .zip(previous.par_chunks(cols))
                .fold(
                    || 0.0f64,
                    |local, (c, p)| local.max(row_max_difference(c, p)),
                )
                .for_each(|partial| {
                    shared.fetch_max(partial.to_bits(), Ordering::Relaxed);
                });
        });

        f64::from_bits(shared.into_inner())
    }
}
