#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! This module provides functionality for solving Sudoku puzzles.

/// Errors raised while parsing puzzles or interpreting solutions.
pub mod error;
/// File parsing for puzzles.
pub mod parser;
/// Grids, the CNF encoding and the decoding of models back into grids.
pub mod solver;

pub use error::SudokuError;
pub use parser::{parse_sudoku, parse_sudoku_file};
pub use solver::{Board, CellDigit, Size, Sudoku, cell_variable};
