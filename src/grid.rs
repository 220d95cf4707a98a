/// Two same-shaped temperature fields stored row-major.
///
/// `current` holds the latest sweep, `previous` the one before it. Row 0 is
/// the north edge, row `rows-1` the south edge, column 0 the west edge and
/// column `cols-1` the east edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    previous: Vec<f64>,
    current: Vec<f64>,
}

impl Grid {
    /// Allocates both fields, zero-filled. Callers must not rely on the fill
    /// value; every cell is written by initialization before it is read.
    ///
    /// `rows * cols` is not checked here; sizes come from a validated
    /// `PlateConfig`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            previous: vec![0.0; rows * cols],
            current: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    #[inline]
    pub fn current(&self, row: usize, col: usize) -> f64 {
        self.current[self.idx(row, col)]
    }

    #[inline]
    pub fn previous(&self, row: usize, col: usize) -> f64 {
        self.previous[self.idx(row, col)]
    }

    #[inline]
    pub fn set_current(&mut self, row: usize, col: usize, value: f64) {
        let idx = self.idx(row, col);
        self.current[idx] = value;
    }

    pub fn current_data(&self) -> &[f64] {
        &self.current
    }

    pub fn previous_data(&self) -> &[f64] {
        &self.previous
    }

    pub fn current_data_mut(&mut self) -> &mut [f64] {
        &mut self.current
    }

    /// `previous` for writing, `current` for reading. Used by the snapshot copy.
    pub fn snapshot_buffers(&mut self) -> (&mut [f64], &[f64]) {
        (&mut self.previous[..], &self.current[..])
    }

    /// `previous` for reading, `current` for writing. Used by the stencil sweep.
    pub fn stencil_buffers(&mut self) -> (&[f64], &mut [f64]) {
        (&self.previous[..], &mut self.current[..])
    }

    /// `previous[i][j] = current[i][j]` for every cell, boundary included.
    pub fn copy_current_into_previous(&mut self) {
        self.previous.copy_from_slice(&self.current);
    }

    /// Number of perimeter cells, corners counted once.
    pub fn boundary_count(&self) -> usize {
        2 * self.rows + 2 * self.cols - 4
    }
}
