#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Disjunctions of literals.

use crate::immutable::ImList;
use crate::sat::assignment::Environment;
use crate::sat::literal::Literal;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// An immutable disjunction of literals.
///
/// The empty clause is false. Duplicate literals are allowed and harmless.
/// Adding a literal allocates one list node and shares everything else with
/// the clause it was added to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Clause {
    literals: ImList<Literal>,
}

/// Outcome of [`Clause::reduce`].
///
/// A clause made true by an assignment has to leave the formula altogether,
/// which is a different thing from a clause that lost its last literal and is
/// now false. Keeping the two apart is what lets the solver drop the first and
/// backtrack on the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduced {
    /// The assigned literal occurs in the clause, so the clause holds.
    Satisfied,
    /// What is left of the clause. May be empty (false), shortened, or the
    /// original clause when the assignment does not touch it.
    Remaining(Clause),
}

impl Reduced {
    /// Whether the clause dropped out.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }

    /// The remaining clause, or `None` when the clause was satisfied.
    #[must_use]
    pub fn remaining(self) -> Option<Clause> {
        match self {
            Self::Satisfied => None,
            Self::Remaining(clause) => Some(clause),
        }
    }
}

impl Clause {
    /// The empty clause.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            literals: ImList::new(),
        }
    }

    /// The clause `(literal)`.
    #[must_use]
    pub fn singleton(literal: Literal) -> Self {
        Self {
            literals: ImList::singleton(literal),
        }
    }

    /// Returns a clause with `literal` added to the disjunction.
    #[must_use]
    pub fn add(&self, literal: Literal) -> Self {
        Self {
            literals: self.literals.add(literal),
        }
    }

    /// Number of literals, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether this is the empty (false) clause.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether exactly one literal is left.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// Literals, most recently added first.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// Whether `literal` occurs with this exact sign.
    #[must_use]
    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    /// Whether the clause holds some literal together with its negation.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        self.iter().any(|&lit| self.contains(lit.negated()))
    }

    /// Picks a literal to branch or propagate on.
    ///
    /// Always the most recently added literal, so repeated runs make the
    /// same choices. Returns `None` only for the empty clause.
    #[must_use]
    pub fn choose_literal(&self) -> Option<Literal> {
        self.literals.first().copied()
    }

    /// Applies the assignment "`literal` is true" to this clause.
    ///
    /// If `literal` occurs the clause is [`Reduced::Satisfied`]. Otherwise
    /// every occurrence of its negation is dropped. A clause mentioning
    /// neither comes back as the same shared allocation.
    #[must_use]
    pub fn reduce(&self, literal: Literal) -> Reduced {
        if self.contains(literal) {
            return Reduced::Satisfied;
        }

        Reduced::Remaining(Self {
            literals: self.literals.remove(&literal.negated()),
        })
    }

    /// Disjunction of two clauses. Literals of `other` already present in
    /// `self` are not repeated.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        other.iter().fold(self.clone(), |acc, &lit| {
            if self.contains(lit) { acc } else { acc.add(lit) }
        })
    }

    /// Truth value under a partial assignment: `Some(true)` once any literal
    /// holds, `Some(false)` once every literal is false, otherwise `None`.
    #[must_use]
    pub fn evaluate(&self, env: &Environment) -> Option<bool> {
        let mut undecided = false;
        for &lit in self.iter() {
            match env.literal_value(lit) {
                Some(true) => return Some(true),
                Some(false) => {}
                None => undecided = true,
            }
        }
        if undecided { None } else { Some(false) }
    }

    /// Whether some literal is true under `env`.
    #[must_use]
    pub fn is_satisfied_by(&self, env: &Environment) -> bool {
        self.evaluate(env) == Some(true)
    }

    /// Whether the two clauses are the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.literals.ptr_eq(&other.literals)
    }
}

impl From<Literal> for Clause {
    fn from(literal: Literal) -> Self {
        Self::singleton(literal)
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self {
            literals: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Literal>> for Clause {
    fn from(literals: Vec<Literal>) -> Self {
        literals.into_iter().collect()
    }
}

impl From<&[Literal]> for Clause {
    fn from(literals: &[Literal]) -> Self {
        literals.iter().copied().collect()
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.iter().join(" | "))
    }
}
