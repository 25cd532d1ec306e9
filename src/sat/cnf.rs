#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Formulas in conjunctive normal form.
//!
//! A [`Formula`] is a conjunction of [`Clause`]s kept in a persistent list.
//! All of the Boolean connectives return new formulas that are still in CNF:
//! `and` concatenates, `or` distributes, and `not` pushes the negation down to
//! the literals with De Morgan's laws and then distributes.
//!
//! Duplicate clauses are never removed. Conjunction is idempotent, and
//! checking for duplicates would cost more than carrying them.

use crate::immutable::ImList;
use crate::sat::assignment::Environment;
use crate::sat::clause::{Clause, Reduced};
use crate::sat::literal::Literal;
use crate::sat::variable::Variable;
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt::{self, Display, Formatter};

/// An immutable CNF formula. The formula with no clauses is true.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formula {
    clauses: ImList<Clause>,
}

impl Formula {
    /// The vacuously true formula.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: ImList::new(),
        }
    }

    /// The formula with the single clause `(var)`.
    #[must_use]
    pub fn from_variable(var: Variable) -> Self {
        Self::from_clause(Clause::singleton(Literal::positive(var)))
    }

    /// The formula holding just `clause`.
    #[must_use]
    pub fn from_clause(clause: Clause) -> Self {
        Self {
            clauses: ImList::singleton(clause),
        }
    }

    /// The unsatisfiable formula: a single empty clause.
    #[must_use]
    pub fn contradiction() -> Self {
        Self::from_clause(Clause::new())
    }

    /// Wraps an existing clause list.
    #[must_use]
    pub const fn from_clauses(clauses: ImList<Clause>) -> Self {
        Self { clauses }
    }

    /// Returns the formula with `clause` conjoined on top.
    #[must_use]
    pub fn add_clause(&self, clause: Clause) -> Self {
        Self {
            clauses: self.clauses.add(clause),
        }
    }

    /// The clauses, most recently added first.
    #[must_use]
    pub const fn clauses(&self) -> &ImList<Clause> {
        &self.clauses
    }

    /// Clauses, most recently added first.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether there are no clauses, i.e. the formula is true.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether the formula holds the empty clause and is therefore false.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.iter().any(Clause::is_empty)
    }

    /// Conjunction. `self` is shared as-is and the clauses of `other` are
    /// added on top of it.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        Self {
            clauses: self.clauses.append(&other.clauses),
        }
    }

    /// Disjunction, by distribution.
    ///
    /// `(x1 & x2) | (y1 & y2)` becomes
    /// `(x1 | y1) & (x1 | y2) & (x2 | y1) & (x2 | y2)`: one merged clause for
    /// every pair, so the result has `self.len() * other.len()` clauses.
    /// Merged clauses may be tautologies; they are kept.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        // true absorbs
        if self.is_empty() || other.is_empty() {
            return Self::new();
        }
        // false is the identity
        if self.is_contradiction() {
            return other.clone();
        }
        if other.is_contradiction() {
            return self.clone();
        }

        self.clauses
            .iter()
            .cartesian_product(other.clauses.iter())
            .map(|(left, right)| left.merge(right))
            .collect()
    }

    /// Negation, returned in CNF.
    ///
    /// Each clause `(l1 | ... | ln)` negates to the conjunction of unit
    /// clauses `(~l1) & ... & (~ln)`; the per-clause negations are then
    /// combined with [`Formula::or`]. The distribution step makes the result
    /// grow exponentially in the number of clauses.
    #[must_use]
    pub fn not(&self) -> Self {
        self.iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|&lit| Clause::singleton(lit.negated()))
                    .collect::<Self>()
            })
            .fold(Self::contradiction(), |acc, negated| acc.or(&negated))
    }

    /// Sets `literal` to true in every clause: satisfied clauses disappear,
    /// everything else (shortened, empty or untouched) is kept.
    #[must_use]
    pub fn substitute(&self, literal: Literal) -> Self {
        self.iter()
            .filter_map(|clause| match clause.reduce(literal) {
                Reduced::Satisfied => None,
                Reduced::Remaining(rest) => Some(rest),
            })
            .collect()
    }

    /// Every clause is true under `env`. Unassigned variables count as
    /// neither true nor false.
    #[must_use]
    pub fn is_satisfied_by(&self, env: &Environment) -> bool {
        self.iter().all(|clause| clause.is_satisfied_by(env))
    }

    /// Distinct variables, in order of first appearance.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = FxHashSet::default();
        self.iter()
            .flat_map(Clause::iter)
            .map(|lit| lit.variable())
            .filter(|var| seen.insert(*var))
            .collect()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.iter().map(Clause::len).sum()
    }

    fn is_contradiction(&self) -> bool {
        self.len() == 1 && self.has_empty_clause()
    }
}

impl From<Clause> for Formula {
    fn from(clause: Clause) -> Self {
        Self::from_clause(clause)
    }
}

impl From<Variable> for Formula {
    fn from(var: Variable) -> Self {
        Self::from_variable(var)
    }
}

impl FromIterator<Clause> for Formula {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Self {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Clause>> for Formula {
    fn from(clauses: Vec<Clause>) -> Self {
        clauses.into_iter().collect()
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Problem[")?;
        for clause in self.iter() {
            write!(f, "\n{clause}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(names: &[&str]) -> Vec<Variable> {
        names.iter().map(|name| Variable::new(name)).collect()
    }

    /// Every total assignment over `vars`.
    fn assignments(vars: &[Variable]) -> Vec<Environment> {
        (0..1u32 << vars.len())
            .map(|bits| {
                vars.iter()
                    .enumerate()
                    .map(|(i, &var)| (var, bits & (1 << i) != 0))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_empty_formula_is_true() {
        let f = Formula::new();
        assert!(f.is_empty());
        assert!(f.is_satisfied_by(&Environment::new()));
    }

    #[test]
    fn test_add_clause_is_persistent() {
        let a = Literal::named("cnf_add_a");
        let base = Formula::from_clause(Clause::singleton(a));
        let extended = base.add_clause(Clause::singleton(!a));
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }

    #[test]
    fn test_and_concatenates() {
        let [a, b, c] = [
            Literal::named("cnf_and_a"),
            Literal::named("cnf_and_b"),
            Literal::named("cnf_and_c"),
        ];
        let left = Formula::from(vec![Clause::singleton(a), Clause::singleton(b)]);
        let right = Formula::from_clause(Clause::from(vec![!b, c]));
        let joined = left.and(&right);

        assert_eq!(joined.len(), 3);
        assert_eq!(left.len(), 2);
        assert!(joined.clauses().rest().ptr_eq(left.clauses()));
    }

    #[test]
    fn test_and_with_itself_is_equivalent() {
        let v = vars(&["cnf_idem_a", "cnf_idem_b"]);
        let f = Formula::from(vec![
            Clause::from(vec![Literal::positive(v[0]), Literal::negative(v[1])]),
            Clause::singleton(Literal::positive(v[1])),
        ]);
        let doubled = f.and(&f);
        assert_eq!(doubled.len(), 2 * f.len());
        for env in assignments(&v) {
            assert_eq!(f.is_satisfied_by(&env), doubled.is_satisfied_by(&env));
        }
    }

    #[test]
    fn test_or_distributes() {
        let v = vars(&["cnf_or_x1", "cnf_or_x2", "cnf_or_y1", "cnf_or_y2"]);
        let [x1, x2, y1, y2] = [v[0], v[1], v[2], v[3]].map(Literal::positive);
        let left = Formula::from(vec![Clause::singleton(x1), Clause::singleton(x2)]);
        let right = Formula::from(vec![Clause::singleton(y1), Clause::singleton(y2)]);
        let result = left.or(&right);

        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|clause| clause.len() == 2));
        for env in assignments(&v) {
            assert_eq!(
                result.is_satisfied_by(&env),
                left.is_satisfied_by(&env) || right.is_satisfied_by(&env)
            );
        }
    }

    #[test]
    fn test_or_with_true_is_true() {
        let a = Literal::named("cnf_or_true");
        let f = Formula::from_clause(Clause::singleton(a));
        assert!(f.or(&Formula::new()).is_empty());
        assert!(Formula::new().or(&f).is_empty());
    }

    #[test]
    fn test_or_with_false_is_identity() {
        let a = Literal::named("cnf_or_false");
        let f = Formula::from_clause(Clause::singleton(a));
        assert_eq!(f.or(&Formula::contradiction()), f);
        assert_eq!(Formula::contradiction().or(&f), f);
    }

    #[test]
    fn test_or_keeps_tautologies() {
        let a = Literal::named("cnf_or_taut");
        let f = Formula::from_clause(Clause::singleton(a));
        let g = Formula::from_clause(Clause::singleton(!a));
        let result = f.or(&g);
        assert_eq!(result.len(), 1);
        assert!(result.iter().all(Clause::is_tautology));
    }

    #[test]
    fn test_not_is_complement() {
        let v = vars(&["cnf_not_a", "cnf_not_b", "cnf_not_c"]);
        let [a, b, c] = [v[0], v[1], v[2]].map(Literal::positive);
        // (a | b) & ~c
        let f = Formula::from(vec![Clause::from(vec![a, b]), Clause::singleton(!c)]);
        let negated = f.not();

        assert_eq!(negated.len(), 2);
        for env in assignments(&v) {
            assert_ne!(f.is_satisfied_by(&env), negated.is_satisfied_by(&env));
        }
    }

    #[test]
    fn test_not_of_constants() {
        assert_eq!(Formula::new().not(), Formula::contradiction());
        assert!(Formula::contradiction().not().is_empty());
    }

    #[test]
    fn test_substitute_drops_satisfied_keeps_rest() {
        let [a, b, c] = [
            Literal::named("cnf_sub_a"),
            Literal::named("cnf_sub_b"),
            Literal::named("cnf_sub_c"),
        ];
        let f = Formula::from(vec![
            Clause::from(vec![a, b]),
            Clause::from(vec![!a, c]),
            Clause::singleton(!a),
            Clause::singleton(b),
        ]);
        let reduced = f.substitute(a);

        assert_eq!(reduced.len(), 3);
        assert!(reduced.has_empty_clause());
        assert!(reduced.iter().any(|clause| *clause == Clause::singleton(c)));
        assert!(reduced.iter().any(|clause| *clause == Clause::singleton(b)));
    }

    #[test]
    fn test_variables_in_first_appearance_order() {
        let v = vars(&["cnf_var_a", "cnf_var_b"]);
        let f = Formula::from(vec![
            Clause::from(vec![Literal::positive(v[1]), Literal::negative(v[0])]),
            Clause::singleton(Literal::positive(v[0])),
        ]);
        assert_eq!(f.variables(), vec![v[1], v[0]]);
        assert_eq!(f.num_literals(), 3);
        assert_eq!(f.variables().into_iter().unique().count(), 2);
    }
}
