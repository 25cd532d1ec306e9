//! Persistent, structurally shared collections.
//!
//! Everything the solver hands between search branches lives in these
//! containers: clauses, formulas and environments. Updating one never touches
//! the value it was derived from, so a failed branch can simply be dropped.

/// A reference-counted singly linked list with O(1) `add` and shared tails.
pub mod list;

pub use list::ImList;
