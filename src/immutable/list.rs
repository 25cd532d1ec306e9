#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! An immutable, persistent singly linked list.
//!
//! `ImList` is a cons list whose nodes are shared through `Rc`. Adding an
//! element allocates exactly one node and reuses the whole existing list as
//! its tail, so cloning a list is O(1) and two lists derived from a common
//! ancestor share every node they have in common.
//!
//! Iteration yields elements from the most recently added to the oldest.
//! Every node caches the length of the list it heads, so `len` is O(1).

use std::fmt::{self, Debug, Formatter};
use std::rc::Rc;

struct Node<T> {
    value: T,
    next: Option<Rc<Node<T>>>,
    len: usize,
}

/// A persistent list. See the module documentation.
pub struct ImList<T> {
    head: Option<Rc<Node<T>>>,
}

impl<T> ImList<T> {
    /// Creates the empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Creates a list holding a single element.
    #[must_use]
    pub fn singleton(value: T) -> Self {
        Self::new().add(value)
    }

    /// Returns a new list with `value` in front of every element of `self`.
    ///
    /// `self` is left untouched and becomes the shared tail of the result.
    #[must_use]
    pub fn add(&self, value: T) -> Self {
        let len = self.len() + 1;
        Self {
            head: Some(Rc::new(Node {
                value,
                next: self.head.clone(),
                len,
            })),
        }
    }

    /// The most recently added element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.value)
    }

    /// Every element except the first, sharing storage with `self`.
    #[must_use]
    pub fn rest(&self) -> Self {
        Self {
            head: self.head.as_ref().and_then(|node| node.next.clone()),
        }
    }

    /// Number of elements. O(1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.len)
    }

    /// Whether the list has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterates from the most recently added element to the oldest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Whether the two lists are the same allocation, not merely equal.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns a list with every element of `other` added on top of `self`.
    ///
    /// `self` is shared untouched; only `other.len()` nodes are allocated.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        let pending: Vec<&T> = other.iter().collect();
        pending
            .into_iter()
            .rev()
            .fold(self.clone(), |acc, value| acc.add(value.clone()))
    }
}

impl<T: PartialEq> ImList<T> {
    /// Linear scan for an element equal to `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|item| item == value)
    }
}

impl<T: PartialEq + Clone> ImList<T> {
    /// Returns a list without any occurrence of `value`.
    ///
    /// When nothing matches, the result is `self` (same allocation). Otherwise
    /// only the prefix up to the last occurrence is copied and the remaining
    /// tail is shared.
    #[must_use]
    pub fn remove(&self, value: &T) -> Self {
        let Some(last) = self
            .iter()
            .enumerate()
            .filter(|(_, item)| *item == value)
            .map(|(index, _)| index)
            .last()
        else {
            return self.clone();
        };

        let mut kept = Vec::with_capacity(last);
        let mut cursor = self.head.as_deref();
        for _ in 0..=last {
            let Some(node) = cursor else { break };
            if node.value != *value {
                kept.push(&node.value);
            }
            cursor = node.next.as_deref();
        }

        let tail = Self {
            head: self.nth_node(last + 1),
        };
        kept.into_iter()
            .rev()
            .fold(tail, |acc, item| acc.add(item.clone()))
    }
}

impl<T> ImList<T> {
    fn nth_node(&self, n: usize) -> Option<Rc<Node<T>>> {
        let mut cursor = self.head.clone();
        for _ in 0..n {
            cursor = cursor?.next.clone();
        }
        cursor
    }
}

impl<T> Clone for ImList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<T> Default for ImList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlinks uniquely owned nodes one at a time; the derived drop would recurse
// once per node and overflow on formulas with tens of thousands of clauses.
impl<T> Drop for ImList<T> {
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(node) = cursor {
            match Rc::try_unwrap(node) {
                Ok(mut node) => cursor = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: PartialEq> PartialEq for ImList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl<T: Eq> Eq for ImList<T> {}

impl<T: Debug> Debug for ImList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Builds a list whose iteration order matches the source iterator.
impl<T> FromIterator<T> for ImList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(Self::new(), |acc, item| acc.add(item))
    }
}

/// Borrowing iterator over an [`ImList`].
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { next: self.next }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.next.map_or(0, |node| node.len);
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a ImList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
