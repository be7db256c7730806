//! Medium grid: one medium id per cell in a flat row-major buffer

use crate::error::{SimError, SimResult};

/// Rows x cols medium ids, indexed by `y * cols + x`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumGrid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl MediumGrid {
    /// New grid filled with the default medium (id 0)
    pub fn new(rows: usize, cols: usize) -> SimResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(SimError::InvalidDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Signed bounds check, for callers working with offsets
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.cols as u64 && (y as u64) < self.rows as u64
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.cols && y < self.rows {
            Some(self.cells[self.idx(x, y)])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, id: u8) -> SimResult<()> {
        if x >= self.cols || y >= self.rows {
            return Err(SimError::OutOfBounds {
                x: x as i64,
                y: y as i64,
            });
        }
        let idx = self.idx(x, y);
        self.cells[idx] = id;
        Ok(())
    }

    /// Write `id` when (x, y) is on the grid, ignore it otherwise
    #[inline]
    pub(crate) fn set_clipped(&mut self, x: i64, y: i64, id: u8) {
        if self.contains(x, y) {
            let idx = self.idx(x as usize, y as usize);
            self.cells[idx] = id;
        }
    }

    pub fn fill(&mut self, id: u8) {
        self.cells.fill(id);
    }

    /// Paint the one-cell outer ring
    pub fn fill_border(&mut self, id: u8) {
        let (rows, cols) = (self.rows, self.cols);
        for x in 0..cols {
            self.cells[x] = id;
            self.cells[(rows - 1) * cols + x] = id;
        }
        for y in 0..rows {
            self.cells[y * cols] = id;
            self.cells[y * cols + cols - 1] = id;
        }
    }

    /// Whether (x, y) lies on the one-cell outer ring
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.cols || y + 1 == self.rows
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Bulk replace from nested rows
    ///
    /// Missing rows or cells and ids rejected by `is_valid` become 0. Extra
    /// rows or cells are ignored. Returns how many cells were defaulted.
    pub fn replace_from_rows<F>(&mut self, rows: &[Vec<Option<i64>>], is_valid: F) -> usize
    where
        F: Fn(u8) -> bool,
    {
        let mut defaulted = 0;
        for y in 0..self.rows {
            let row = rows.get(y);
            for x in 0..self.cols {
                let raw = row.and_then(|r| r.get(x)).copied().flatten();
                let id = raw
                    .and_then(|v| u8::try_from(v).ok())
                    .filter(|&id| is_valid(id));
                if id.is_none() {
                    defaulted += 1;
                }
                let idx = self.idx(x, y);
                self.cells[idx] = id.unwrap_or(0);
            }
        }
        defaulted
    }

    /// Nested row view, as stored in snapshots
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.cols).map(|row| row.to_vec()).collect()
    }

    /// Cell count per medium id
    pub fn histogram(&self) -> [usize; 256] {
        let mut counts = [0usize; 256];
        for &id in &self.cells {
            counts[usize::from(id)] += 1;
        }
        counts
    }
}
