use crate::boundary;
use crate::config::{Backend, BoundaryTemperatures};
use crate::grid::Grid;

use super::{relax_row, row_max_difference, SweepBackend};

/// Plain nested loops on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleBackend;

impl SweepBackend for SingleBackend {
    fn kind(&self) -> Backend {
        Backend::Single
    }

    fn threads(&self) -> usize {
        1
    }

    fn initialize_boundary(&self, grid: &mut Grid, temps: &BoundaryTemperatures) -> f64 {
        boundary::initialize_boundary(grid, temps)
    }

    fn seed_interior(&self, grid: &mut Grid, mean: f64) {
        boundary::seed_interior(grid, mean);
    }

    fn snapshot(&self, grid: &mut Grid) {
        grid.copy_current_into_previous();
    }

    fn relax(&self, grid: &mut Grid) {
        let rows = grid.rows();
        let cols = grid.cols();
        let (src, dst) = grid.stencil_buffers();

        for (r, dst_row) in dst[cols..(rows - 1) * cols].chunks_mut(cols).enumerate() {
            relax_row(src, dst_row, r + 1, cols);
        }
    }

    fn max_difference(&self, grid: &Grid) -> f64 {
        let rows = grid.rows();
        let cols = grid.cols();
        let interior = cols..(rows - 1) * cols;

        grid.current_data()[interior.clone()]
            .chunks(cols)
            .zip(grid.previous_data()[interior].chunks(cols))
            .map(|(current, previous)| row_max_difference(current, previous))
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_uses_previous_not_partial_updates() {
        // 3x4: two interior cells side by side; a Gauss-Seidel order would let
        // the second see the first's new value
        let backend = SingleBackend;
        let mut grid = Grid::new(3, 4);
        let temps = BoundaryTemperatures::uniform(0.0);
        backend.initialize_boundary(&mut grid, &temps);
        grid.set_current(1, 1, 8.0);
        grid.set_current(1, 2, 4.0);

        backend.snapshot(&mut grid);
        backend.relax(&mut grid);

        assert_eq!(grid.current(1, 1), 1.0);
        assert_eq!(grid.current(1, 2), 2.0);
        assert_eq!(backend.max_difference(&grid), 7.0);
    }

    #[test]
    fn boundary_survives_sweeps() {
        let backend = SingleBackend;
        let temps = BoundaryTemperatures::default();
        let mut grid = Grid::new(6, 5);
        let mean = backend.initialize_boundary(&mut grid, &temps);
        backend.seed_interior(&mut grid, mean);

        for _ in 0..25 {
            backend.snapshot(&mut grid);
            backend.relax(&mut grid);
        }
        assert!(boundary::boundary_intact(&grid, &temps));
    }
}
