use std::io;
use thiserror::Error;

/// Everything that can go wrong reading a puzzle or reading a model back
/// into a grid.
///
/// Rows and columns are reported 1-based.
#[derive(Debug, Error)]
pub enum SudokuError {
    /// Reading the puzzle file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The grid has a side length other than 4, 9, 16 or 25.
    #[error("unsupported grid size {0}; expected 4, 9, 16 or 25")]
    InvalidSize(usize),

    /// A row does not have one entry per column.
    #[error("row {row} has {found} entries, expected {expected}")]
    RowLength {
        /// The short or long row.
        row: usize,
        /// Entries it has.
        found: usize,
        /// Entries it should have.
        expected: usize,
    },

    /// An entry is neither a digit, a blank nor a letter valid for the grid.
    #[error("invalid entry '{found}' at row {row}, column {col}")]
    InvalidCharacter {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
        /// The entry as written.
        found: String,
    },

    /// A numeric entry is larger than the side length.
    #[error("value {value} at row {row}, column {col} does not fit a {size}x{size} grid")]
    ValueOutOfRange {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
        /// The value found.
        value: usize,
        /// Side length of the grid.
        size: usize,
    },

    /// A model sets two digits true in the same cell.
    #[error("solution places more than one digit at row {row}, column {col}")]
    MultipleValues {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
    },

    /// A model sets no digit true in a cell.
    #[error("solution leaves row {row}, column {col} empty")]
    EmptyCell {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
    },
}
