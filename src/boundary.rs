//! Fixed edge temperatures and the interior seed.
//!
//! These are the sequential versions; the parallel backends in
//! [`crate::implementations`] must write the same cells and produce the same
//! mean.

use crate::config::BoundaryTemperatures;
use crate::grid::Grid;

/// Writes the four edges into `current`.
///
/// North and south rows span every column, corners included. West and east
/// columns only cover rows `1..rows-1`, so the corners keep the north/south
/// value.
pub fn apply_boundary(grid: &mut Grid, temps: &BoundaryTemperatures) {
    let rows = grid.rows();
    let cols = grid.cols();

    for i in 1..rows - 1 {
        grid.set_current(i, 0, temps.west);
        grid.set_current(i, cols - 1, temps.east);
    }
    for j in 0..cols {
        grid.set_current(rows - 1, j, temps.south);
        grid.set_current(0, j, temps.north);
    }
}

/// Sum of every boundary cell of `current`, each corner counted once.
pub fn boundary_sum(grid: &Grid) -> f64 {
    let rows = grid.rows();
    let cols = grid.cols();

    let sides = (1..rows - 1).map(|i| grid.current(i, 0) + grid.current(i, cols - 1));
    let edges = (0..cols).map(|j| grid.current(rows - 1, j) + grid.current(0, j));
    fold_boundary_sum(sides, edges)
}

/// Adds per-row `west + east` pairs top to bottom, then per-column
/// `south + north` pairs left to right.
///
/// Every backend funnels its pairs through here in this order, so the mean
/// has the same bits whatever the thread count.
pub fn fold_boundary_sum(
    sides: impl IntoIterator<Item = f64>,
    edges: impl IntoIterator<Item = f64>,
) -> f64 {
    let sum = sides.into_iter().fold(0.0f64, |acc, pair| acc + pair);
    edges.into_iter().fold(sum, |acc, pair| acc + pair)
}

/// Writes the edges and returns their mean temperature.
pub fn initialize_boundary(grid: &mut Grid, temps: &BoundaryTemperatures) -> f64 {
    apply_boundary(grid, temps);
    boundary_sum(grid) / grid.boundary_count() as f64
}

/// Sets every interior cell of `current` to `mean`.
pub fn seed_interior(grid: &mut Grid, mean: f64) {
    let rows = grid.rows();
    let cols = grid.cols();
    for row in grid.current_data_mut()[cols..(rows - 1) * cols].chunks_mut(cols) {
        row[1..cols - 1].fill(mean);
    }
}

/// True when every boundary cell of `current` still holds its fixed value.
pub fn boundary_intact(grid: &Grid, temps: &BoundaryTemperatures) -> bool {
    let rows = grid.rows();
    let cols = grid.cols();

    let rows_ok = (0..cols)
        .all(|j| grid.current(0, j) == temps.north && grid.current(rows - 1, j) == temps.south);
    let cols_ok = (1..rows - 1)
        .all(|i| grid.current(i, 0) == temps.west && grid.current(i, cols - 1) == temps.east);
    rows_ok && cols_ok
}
