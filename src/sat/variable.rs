#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Named Boolean variables.
//!
//! A `Variable` is a small copyable handle into a process-wide interner.
//! Creating a variable from a name that has been seen before returns the same
//! handle, so equality and hashing are cheap integer operations while the
//! name stays available for display and for decoding solutions.

use rustc_hash::FxHashMap;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

#[derive(Debug, Default)]
struct Interner {
    ids: FxHashMap<Arc<str>, u32>,
    names: Vec<Arc<str>>,
}

impl Interner {
    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }

        let id = u32::try_from(self.names.len()).expect("variable interner overflowed u32");
        let name: Arc<str> = Arc::from(name);
        self.names.push(Arc::clone(&name));
        self.ids.insert(name, id);
        id
    }
}

fn interner() -> &'static Mutex<Interner> {
    static INTERNER: OnceLock<Mutex<Interner>> = OnceLock::new();
    INTERNER.get_or_init(|| Mutex::new(Interner::default()))
}

/// An interned Boolean variable.
///
/// Ordering follows interning order, which is stable for the lifetime of the
/// process but says nothing about the names themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(u32);

impl Variable {
    /// Returns the variable called `name`, creating it on first use.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut interner = interner().lock().unwrap_or_else(PoisonError::into_inner);
        Self(interner.intern(name))
    }

    /// The name this variable was created with.
    #[must_use]
    pub fn name(self) -> Arc<str> {
        let interner = interner().lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&interner.names[self.0 as usize])
    }

    /// The interner index backing this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Variable {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_variable() {
        let a = Variable::new("interned_a");
        let b = Variable::from(String::from("interned_a"));
        assert_eq!(a, b);
        assert_eq!(a.index(), b.index());
    }

    #[test]
    fn test_distinct_names_distinct_variables() {
        assert_ne!(Variable::new("distinct_x"), Variable::new("distinct_y"));
    }

    #[test]
    fn test_name_round_trips() {
        let v = Variable::new("v1_2_3");
        assert_eq!(&*v.name(), "v1_2_3");
        assert_eq!(v.to_string(), "v1_2_3");
    }
}
