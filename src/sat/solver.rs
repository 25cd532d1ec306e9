#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solver interface and its search statistics.

use crate::sat::assignment::Environment;
use crate::sat::cnf::Formula;
use std::fmt::{self, Display, Formatter};

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Branching steps, i.e. literals tried without being forced.
    pub decisions: usize,
    /// Literals forced by a unit clause.
    pub propagations: usize,
    /// Search states abandoned because they held an empty clause.
    pub conflicts: usize,
    /// Deepest point of the search, counted in assigned literals.
    pub max_depth: usize,
}

impl Display for SolutionStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "decisions: {}, propagations: {}, conflicts: {}, max depth: {}",
            self.decisions, self.propagations, self.conflicts, self.max_depth
        )
    }
}

/// A complete SAT procedure over [`Formula`]s.
///
/// Unsatisfiability is a normal outcome and comes back as `None`.
pub trait Solver {
    /// Prepares a solver for `formula`. No search happens yet.
    fn new(formula: Formula) -> Self;

    /// Searches for an environment under which every clause holds.
    fn solve(&mut self) -> Option<Environment>;

    /// Counters from the most recent call to [`Solver::solve`].
    fn stats(&self) -> SolutionStats;
}
