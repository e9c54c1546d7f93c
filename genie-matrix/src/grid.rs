//! In-memory color state of the custom matrix

use genie_transport::{MatrixDimensions, RgbColor};

use crate::error::MatrixError;
use crate::layout::MatrixPos;

/// Row-major `rows x cols` grid of colors, all off at creation
///
/// The grid holds what the device *should* show. It is never read back from
/// the device and its dimensions never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    dims: MatrixDimensions,
    cells: Vec<RgbColor>,
}

impl GridModel {
    pub fn new(dims: MatrixDimensions) -> Self {
        Self {
            dims,
            cells: vec![RgbColor::OFF; dims.len()],
        }
    }

    pub fn dimensions(&self) -> MatrixDimensions {
        self.dims
    }

    fn index(&self, pos: MatrixPos) -> Result<usize, MatrixError> {
        if self.dims.contains(pos.row, pos.col) {
            Ok(pos.row * self.dims.cols + pos.col)
        } else {
            Err(MatrixError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.dims.rows,
                cols: self.dims.cols,
            })
        }
    }

    /// Set one cell
    pub fn paint(&mut self, pos: MatrixPos, color: RgbColor) -> Result<(), MatrixError> {
        let idx = self.index(pos)?;
        self.cells[idx] = color;
        Ok(())
    }

    /// Turn one cell off
    pub fn erase(&mut self, pos: MatrixPos) -> Result<(), MatrixError> {
        self.paint(pos, RgbColor::OFF)
    }

    /// Turn every cell off
    pub fn clear(&mut self) {
        self.cells.fill(RgbColor::OFF);
    }

    pub fn get(&self, pos: MatrixPos) -> Option<RgbColor> {
        self.index(pos).ok().map(|idx| self.cells[idx])
    }

    /// Colors of one row, `cols` long
    pub fn row_snapshot(&self, row: usize) -> Result<&[RgbColor], MatrixError> {
        if row >= self.dims.rows {
            return Err(MatrixError::RowOutOfRange {
                row,
                rows: self.dims.rows,
            });
        }
        let start = row * self.dims.cols;
        Ok(&self.cells[start..start + self.dims.cols])
    }

    /// Number of cells that are not off
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_off()).count()
    }
}
