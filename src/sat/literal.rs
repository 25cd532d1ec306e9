#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Literals: a variable in positive or negated form.

use crate::sat::variable::Variable;
use core::ops::{Neg, Not};
use std::fmt::{self, Display, Formatter};

/// A variable or its negation.
///
/// Positive and negative occurrences are distinct variants rather than a
/// variable paired with a flag, so a match on a literal always spells out
/// both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Literal {
    /// `x`
    Positive(Variable),
    /// `~x`
    Negative(Variable),
}

impl Literal {
    /// The literal over `var` that holds when `var` equals `polarity`.
    #[must_use]
    pub const fn new(var: Variable, polarity: bool) -> Self {
        if polarity {
            Self::Positive(var)
        } else {
            Self::Negative(var)
        }
    }

    /// `var` itself.
    #[must_use]
    pub const fn positive(var: Variable) -> Self {
        Self::Positive(var)
    }

    /// The negation of `var`.
    #[must_use]
    pub const fn negative(var: Variable) -> Self {
        Self::Negative(var)
    }

    /// Shorthand for `Literal::positive(Variable::new(name))`.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::Positive(Variable::new(name))
    }

    /// The underlying variable, regardless of sign.
    #[must_use]
    pub const fn variable(self) -> Variable {
        match self {
            Self::Positive(var) | Self::Negative(var) => var,
        }
    }

    /// `true` for a positive occurrence. This is also the value the variable
    /// must take for the literal to hold.
    #[must_use]
    pub const fn polarity(self) -> bool {
        matches!(self, Self::Positive(_))
    }

    /// Inverse of [`Literal::polarity`].
    #[must_use]
    pub const fn is_negated(self) -> bool {
        !self.polarity()
    }

    /// The complementary literal.
    #[must_use]
    pub const fn negated(self) -> Self {
        match self {
            Self::Positive(var) => Self::Negative(var),
            Self::Negative(var) => Self::Positive(var),
        }
    }

    /// Truth value of the literal once its variable is set to `value`.
    #[must_use]
    pub const fn eval_with(self, value: bool) -> bool {
        value == self.polarity()
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl Neg for &Literal {
    type Output = Literal;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Not for &Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl From<Variable> for Literal {
    fn from(var: Variable) -> Self {
        Self::Positive(var)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive(var) => write!(f, "{var}"),
            Self::Negative(var) => write!(f, "~{var}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        let a = Variable::new("lit_a");
        assert_eq!(Literal::positive(a).negated(), Literal::negative(a));
        assert_eq!(Literal::negative(a).negated(), Literal::positive(a));
        assert_eq!(!Literal::positive(a), -Literal::positive(a));
    }

    #[test]
    fn test_negation_is_involution() {
        for name in ["lit_p", "lit_q", "lit_r"] {
            for polarity in [true, false] {
                let lit = Literal::new(Variable::new(name), polarity);
                assert_eq!(lit.negated().negated(), lit);
                assert_eq!(lit.negated().variable(), lit.variable());
                assert_ne!(lit.negated(), lit);
            }
        }
    }

    #[test]
    fn test_eval_with() {
        let lit = Literal::named("lit_e");
        assert!(lit.eval_with(true));
        assert!(!lit.eval_with(false));
        assert!(lit.negated().eval_with(false));
    }

    #[test]
    fn test_display() {
        let lit = Literal::named("lit_d");
        assert_eq!(lit.to_string(), "lit_d");
        assert_eq!((!lit).to_string(), "~lit_d");
    }
}
