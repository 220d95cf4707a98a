use std::panic;
use std::sync::{Mutex, PoisonError};
use std::thread;

use crate::boundary::fold_boundary_sum;
use crate::config::{Backend, BoundaryTemperatures};
use crate::grid::Grid;

use super::{band_rows, relax_row, row_max_difference, SweepBackend};

/// Fork-join over `std::thread::scope`.
///
/// Each region splits the rows it writes into at most `threads` contiguous
/// bands and spawns one thread per band. Leaving the scope joins them all, so
/// nothing from the next region starts before every band of this one is done.
#[derive(Clone, Copy, Debug)]
pub struct ScopedBackend {
    threads: usize,
}

impl ScopedBackend {
    pub fn new(threads: usize) -> Self {
        ScopedBackend {
            threads: threads.max(1),
        }
    }

    /// Elements per band when `rows` rows of width `cols` are split up.
    fn band_len(&self, rows: usize, cols: usize) -> usize {
        band_rows(rows, self.threads) * cols
    }
}

fn join_band<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
}

impl SweepBackend for ScopedBackend {
    fn kind(&self) -> Backend {
        Backend::Scoped
    }

    fn threads(&self) -> usize {
        self.threads
    }

    fn initialize_boundary(&self, grid: &mut Grid, temps: &BoundaryTemperatures) -> f64 {
        let rows = grid.rows();
        let cols = grid.cols();
        let count = grid.boundary_count() as f64;
        let band = self.band_len(rows - 2, cols);
        let data = grid.current_data_mut();

        let (north, rest) = data.split_at_mut(cols);
        let (middle, south) = rest.split_at_mut((rows - 2) * cols);

        thread::scope(|scope| {
            scope.spawn(|| north.fill(temps.north));
            scope.spawn(|| south.fill(temps.south));
            for chunk in middle.chunks_mut(band) {
                scope.spawn(move || {
                    for row in chunk.chunks_mut(cols) {
                        row[0] = temps.west;
                        row[cols - 1] = temps.east;
                    }
                });
            }
        });

        // Each band hands back its row pairs; they are concatenated in band
        // order and folded in the same sequence as the single-threaded sum.
        let (sides, edges) = thread::scope(|scope| {
            let edges = scope.spawn(|| {
                south
                    .iter()
                    .zip(north.iter())
                    .map(|(s, n)| s + n)
                    .collect::<Vec<f64>>()
            });
            let bands: Vec<_> = middle
                .chunks(band)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .chunks(cols)
                            .map(|row| row[0] + row[cols - 1])
                            .collect::<Vec<f64>>()
                    })
                })
                .collect();

            let sides: Vec<f64> = bands.into_iter().flat_map(join_band).collect();
            (sides, join_band(edges))
        });

        fold_boundary_sum(sides, edges) / count
    }

    fn seed_interior(&self, grid: &mut Grid, mean: f64) {
        let rows = grid.rows();
        let cols = grid.cols();
        let band = self.band_len(rows - 2, cols);
        let interior = &mut grid.current_data_mut()[cols..(rows - 1) * cols];

        thread::scope(|scope| {
            for chunk in interior.chunks_mut(band) {
                scope.spawn(move || {
                    for row in chunk.chunks_mut(cols) {
                        row[1..cols - 1].fill(mean);
                    }
                });
            }
        });
    }

    fn snapshot(&self, grid: &mut Grid) {
        let band = self.band_len(grid.rows(), grid.cols());
        let (previous, current) = grid.snapshot_buffers();

        thread::scope(|scope| {
            for (dst, src) in previous.chunks_mut(band).zip(current.chunks(band)) {
                scope.spawn(move || dst.copy_from_slice(src));
            }
        });
    }

    fn relax(&self, grid: &mut Grid) {
        let rows = grid.rows();
        let cols = grid.cols();
        let per_band = band_rows(rows - 2, self.threads);
        let (src, dst) = grid.stencil_buffers();
        let interior_dst = &mut dst[cols..(rows - 1) * cols];

        thread::scope(|scope| {
            for (b, chunk) in interior_dst.chunks_mut(per_band * cols).enumerate() {
                scope.spawn(move || {
                    let first = 1 + b * per_band;
                    for (r, dst_row) in chunk.chunks_mut(cols).enumerate() {
                        relax_row(src, dst_row, first + r, cols);
                    }
                });
            }
        });
    }

    fn max_difference(&self, grid: &Grid) -> f64 {
        let rows = grid.rows();
        let cols = grid.cols();
        let band = self.band_len(rows - 2, cols);
        let interior = cols..(rows - 1) * cols;
        let current = &grid.current_data()[interior.clone()];
        let previous = &grid.previous_data()[interior];

        let diff = Mutex::new(0.0f64);
        let shared = &diff;

        thread::scope(|scope| {
            for (c, p) in current.chunks(band).zip(previous.chunks(band)) {
                scope.spawn(move || {
                    let mut my_diff = 0.0f64;
                    for (c_row, p_row) in c.chunks(cols).zip(p.chunks(cols)) {
                        my_diff = my_diff.max(row_max_difference(c_row, p_row));
                    }

                    // one short critical section per thread
                    let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
                    if *guard < my_diff {
                        *guard = my_diff;
                    }
                });
            }
        });

        diff.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementations::SingleBackend;

    fn run_sweeps(backend: &dyn SweepBackend, rows: usize, cols: usize, sweeps: usize) -> Grid {
        let mut grid = Grid::new(rows, cols);
        let mean = backend.initialize_boundary(&mut grid, &BoundaryTemperatures::default());
        backend.seed_interior(&mut grid, mean);
        for _ in 0..sweeps {
            backend.snapshot(&mut grid);
            backend.relax(&mut grid);
        }
        grid
    }

    #[test]
    fn matches_single_for_uneven_bands() {
        let single = run_sweeps(&SingleBackend, 13, 7, 15);
        for threads in [1, 2, 3, 5, 16] {
            let scoped = ScopedBackend::new(threads);
            let grid = run_sweeps(&scoped, 13, 7, 15);
            assert_eq!(grid.current_data(), single.current_data(), "threads = {threads}");
            assert_eq!(
                scoped.max_difference(&grid),
                SingleBackend.max_difference(&single)
            );
        }
    }

    #[test]
    fn mean_is_bit_identical_for_inexact_temperatures() {
        let temps = BoundaryTemperatures {
            north: 0.1,
            south: 0.7,
            east: 0.3,
            west: 0.9,
        };
        let mut reference = Grid::new(97, 61);
        let expected = SingleBackend.initialize_boundary(&mut reference, &temps);

        for threads in [1, 2, 3, 7, 16] {
            let mut grid = Grid::new(97, 61);
            let mean = ScopedBackend::new(threads).initialize_boundary(&mut grid, &temps);
            assert_eq!(mean.to_bits(), expected.to_bits(), "threads = {threads}");
        }
    }

    #[test]
    fn more_threads_than_rows() {
        let scoped = ScopedBackend::new(64);
        let grid = run_sweeps(&scoped, 3, 3, 2);
        assert_eq!(grid.current(1, 1), 75.0);
    }

    #[test]
    fn zero_threads_falls_back_to_one() {
        assert_eq!(ScopedBackend::new(0).threads(), 1);
    }
}
