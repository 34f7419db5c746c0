use std::any::Any;
use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};

use crate::key::{Key, KeyMap};

/// A single-threaded store of memoized results.
///
/// Any number of [`Memoized`](crate::Memoized) wrappers can share one store.
/// Their entries are kept apart by their names. Entries are only ever added:
/// there is no eviction and no way to clear a store short of dropping it.
#[derive(Default)]
pub struct Store {
    /// Maps from keys to memoized results.
    map: RefCell<KeyMap<Box<dyn Any>>>,
}

/// The outcome of looking up a key in a store.
pub(crate) enum Lookup<T> {
    /// A result was stored for the key.
    Hit(T),
    /// Nothing was stored for the key yet.
    Miss,
    /// Something of a different type was stored for the key.
    Mismatch,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of memoized results.
    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    /// Whether nothing was memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look for a memoized result.
    pub(crate) fn lookup<T>(&self, key: Key) -> Lookup<T>
    where
        T: Clone + 'static,
    {
        match self.map.borrow().get(&key) {
            None => Lookup::Miss,
            Some(entry) => match entry.downcast_ref::<T>() {
                Some(output) => Lookup::Hit(output.clone()),
                None => Lookup::Mismatch,
            },
        }
    }

    /// Store a result unless one was already stored for the key.
    ///
    /// An existing entry can only appear if the memoized function recursed
    /// into itself with the same arguments. The first result is kept.
    pub(crate) fn insert<T>(&self, key: Key, output: T)
    where
        T: 'static,
    {
        self.map.borrow_mut().entry(key).or_insert_with(|| Box::new(output));
    }
}

impl Debug for Store {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Store").field("len", &self.len()).finish()
    }
}
