//! Error types for grid construction.

use derive_more::{Display, Error};

use crate::maze::Pos;

/// Failure to build a grid or session from caller-supplied data.
///
/// Generated mazes never produce these; they come from hand-built grids
/// (`Grid::from_ascii`) and explicit session placement.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MazeError {
    /// Grid has fewer than 2 rows or columns.
    #[display("grid must be at least 2x2, got {size}")]
    TooSmall { size: usize },

    /// A row's length differs from the row count.
    #[display("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Character other than `#` or `.` in an ASCII grid.
    #[display("unexpected character {ch:?} at row {row}, col {col}")]
    UnexpectedChar { ch: char, row: usize, col: usize },

    /// Position lies outside an N x N grid.
    #[display("position {pos} is outside a {size}x{size} grid")]
    OutOfBounds { pos: Pos, size: usize },
}
