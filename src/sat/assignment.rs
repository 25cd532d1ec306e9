#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Truth assignments.
//!
//! An [`Environment`] maps variables to [`VarState`]s. It is persistent: every
//! `put` returns a new environment sharing all earlier bindings with the one
//! it came from, so the search can hand the same environment to two sibling
//! branches without either seeing the other's bindings.

use crate::immutable::ImList;
use crate::sat::literal::Literal;
use crate::sat::variable::Variable;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::{self, Display, Formatter};

/// Ternary value of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    /// Not bound yet.
    #[default]
    Unassigned,
    /// Bound to the given value.
    Assigned(bool),
}

impl VarState {
    /// Whether a value has been bound.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// Whether no value has been bound.
    #[must_use]
    pub const fn is_unassigned(&self) -> bool {
        !self.is_assigned()
    }

    /// Bound to true.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Assigned(true))
    }

    /// Bound to false.
    #[must_use]
    pub const fn is_false(&self) -> bool {
        matches!(self, Self::Assigned(false))
    }

    /// The bound value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(*b),
            Self::Unassigned => None,
        }
    }
}

impl From<bool> for VarState {
    fn from(value: bool) -> Self {
        Self::Assigned(value)
    }
}

/// A persistent partial assignment of truth values to variables.
///
/// Stored as an association list, newest binding first. Along one search path
/// each variable is bound at most once, so the list never grows beyond the
/// number of variables in the formula.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    bindings: ImList<(Variable, bool)>,
}

impl Environment {
    /// The environment in which every variable is unassigned.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bindings: ImList::new(),
        }
    }

    /// Returns an environment with `var` bound to `value`.
    ///
    /// # Panics
    ///
    /// If `var` is already bound to `!value`. Binding it again to the same
    /// value is a no-op.
    #[must_use]
    pub fn put(&self, var: Variable, value: bool) -> Self {
        match self.get(var) {
            VarState::Assigned(current) => {
                assert_eq!(
                    current, value,
                    "variable {var} rebound from {current} to {value}"
                );
                self.clone()
            }
            VarState::Unassigned => Self {
                bindings: self.bindings.add((var, value)),
            },
        }
    }

    /// `put(var, true)`.
    #[must_use]
    pub fn put_true(&self, var: Variable) -> Self {
        self.put(var, true)
    }

    /// `put(var, false)`.
    #[must_use]
    pub fn put_false(&self, var: Variable) -> Self {
        self.put(var, false)
    }

    /// Binds the variable of `literal` so that the literal holds.
    #[must_use]
    pub fn assign(&self, literal: Literal) -> Self {
        self.put(literal.variable(), literal.polarity())
    }

    /// The state of `var`, searching from the newest binding.
    #[must_use]
    pub fn get(&self, var: Variable) -> VarState {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == var)
            .map_or(VarState::Unassigned, |&(_, value)| VarState::Assigned(value))
    }

    /// The value of `var`, or `None` when unassigned.
    #[must_use]
    pub fn var_value(&self, var: Variable) -> Option<bool> {
        self.get(var).value()
    }

    /// The value of `literal`, or `None` when its variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.var_value(literal.variable())
            .map(|value| literal.eval_with(value))
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings from the most recent to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.bindings.iter().copied()
    }

    /// Variables bound to true.
    pub fn true_variables(&self) -> impl Iterator<Item = Variable> + '_ {
        self.iter().filter(|(_, value)| *value).map(|(var, _)| var)
    }

    /// Flattens the bindings into a hash map for repeated lookups.
    #[must_use]
    pub fn to_map(&self) -> FxHashMap<Variable, bool> {
        self.iter().collect()
    }
}

impl FromIterator<(Variable, bool)> for Environment {
    fn from_iter<I: IntoIterator<Item = (Variable, bool)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |env, (var, value)| env.put(var, value))
    }
}

/// Prints bindings sorted by name, e.g. `{a: true, b: false}`.
impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let entries = self
            .iter()
            .map(|(var, value)| (var.name(), value))
            .sorted()
            .map(|(name, value)| format!("{name}: {value}"))
            .join(", ");
        write!(f, "{{{entries}}}")
    }
}
