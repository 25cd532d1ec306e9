#![deny(missing_docs)]
//! This crate provides a DPLL SAT solver over immutable CNF formulas, and a
//! Sudoku encoder built on top of it.

/// Persistent data structures shared between formulas and search states.
pub mod immutable;

/// The `sat` module implements the SAT solver, which determines the satisfiability of Boolean
/// formulas.
pub mod sat;

/// The `sudoku` module turns Sudoku puzzles of side 4, 9, 16 or 25 into CNF and reads models
/// back into filled grids.
pub mod sudoku;
