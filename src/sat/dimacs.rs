#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading and writing the DIMACS CNF format.
//!
//! The DIMACS CNF format is the standard text format for SAT problems:
//! - Comment lines start with 'c'.
//! - A problem line 'p cnf <`num_variables`> <`num_clauses`>' gives the sizes.
//!   The parser ignores the counts and takes the clauses as they come.
//! - Each clause is a whitespace-separated list of non-zero integers,
//!   positive for a variable and negative for its negation, terminated by '0'.
//! - An optional '%' line ends the data.
//!
//! Parsed variable `n` is named `"n"`. When writing, variables are numbered by
//! first appearance and each number is mapped back to its name in a comment,
//! so a Sudoku formula can be handed to another solver and its model decoded.

use crate::sat::clause::Clause;
use crate::sat::cnf::Formula;
use crate::sat::literal::Literal;
use crate::sat::variable::Variable;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::Write as _;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading DIMACS input.
#[derive(Debug, Error)]
pub enum DimacsError {
    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A token in a clause line is not an integer.
    #[error("line {line}: '{token}' is not a literal")]
    InvalidLiteral {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
}

/// Parses a single DIMACS integer into a literal.
///
/// # Panics
///
/// If `value` is zero, which terminates clauses and is not a literal.
#[must_use]
pub fn literal_from_i32(value: i32) -> Literal {
    assert_ne!(value, 0, "0 is a clause terminator, not a literal");
    Literal::new(
        Variable::new(&value.unsigned_abs().to_string()),
        value.is_positive(),
    )
}

/// Parses DIMACS data from a `BufRead` source.
///
/// Clauses may span several lines; a clause ends at each `0`. A trailing
/// clause without its terminating `0` is still kept.
///
/// # Errors
///
/// If reading fails or a token is not an integer.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Formula, DimacsError> {
    let mut formula = Formula::new();
    let mut current = Clause::new();
    let mut open = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None | Some(&"c" | &"p") => {}
            Some(_) => {
                for token in parts {
                    let value = token
                        .parse::<i32>()
                        .map_err(|_| DimacsError::InvalidLiteral {
                            line: index + 1,
                            token: token.to_string(),
                        })?;

                    if value == 0 {
                        formula = formula.add_clause(current);
                        current = Clause::new();
                        open = false;
                    } else {
                        current = current.add(literal_from_i32(value));
                        open = true;
                    }
                }
            }
        }
    }

    if open {
        formula = formula.add_clause(current);
    }

    Ok(formula)
}

/// Parses a DIMACS string.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_str(input: &str) -> Result<Formula, DimacsError> {
    parse_dimacs(input.as_bytes())
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// If the file cannot be opened or read, or its content is malformed.
pub fn parse_file<P: AsRef<Path>>(file_path: P) -> Result<Formula, DimacsError> {
    let file = std::fs::File::open(file_path)?;
    let reader = io::BufReader::new(file);
    parse_dimacs(reader)
}

/// Renders `formula` in DIMACS CNF.
///
/// Variables are numbered from 1 in order of first appearance. One
/// `c <number> <name>` comment per variable records the numbering.
#[must_use]
pub fn to_dimacs(formula: &Formula) -> String {
    let variables = formula.variables();
    let numbering: FxHashMap<Variable, usize> = variables
        .iter()
        .enumerate()
        .map(|(index, &var)| (var, index + 1))
        .collect();

    let mut out = String::new();
    for (index, var) in variables.iter().enumerate() {
        let _ = writeln!(out, "c {} {var}", index + 1);
    }
    let _ = writeln!(out, "p cnf {} {}", variables.len(), formula.len());

    for clause in formula.iter() {
        let literals = clause
            .iter()
            .map(|lit| {
                let number = numbering[&lit.variable()];
                if lit.polarity() {
                    format!("{number}")
                } else {
                    format!("-{number}")
                }
            })
            .chain(std::iter::once(String::from("0")))
            .join(" ");
        let _ = writeln!(out, "{literals}");
    }

    out
}
