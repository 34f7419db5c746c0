use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::warn;

use crate::key::{Key, KeyMap};

/// A slot for the result of one key. Filled at most once.
type Slot = Arc<OnceCell<Box<dyn Any + Send + Sync>>>;

/// A thread-safe store of memoized results.
///
/// Unlike [`Store`](crate::Store), this can be shared between threads. For
/// each key, at most one computation succeeds: concurrent callers with the
/// same key wait for the running computation and then reuse its result. A
/// failed computation leaves the key empty and the next caller retries.
///
/// Computing a key must not request the same key again, which would wait on
/// itself forever. Requesting other keys from within a computation is fine.
#[derive(Default)]
pub struct SharedStore {
    /// Maps from keys to result slots.
    slots: Mutex<KeyMap<Slot>>,
}

/// A result obtained from a [`SharedStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetched<T> {
    /// The memoized or freshly computed result.
    pub output: T,
    /// Whether the result was already stored.
    pub hit: bool,
}

impl SharedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of memoized results.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Whether nothing was memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the result stored for `key` or compute and store it.
    ///
    /// Errors from `compute` are returned without storing anything. If the
    /// key holds a result of a different type (which requires a hash
    /// collision), `compute` runs and its result is not stored.
    pub fn get_or_try_insert_with<T, E>(
        &self,
        key: Key,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<Fetched<T>, E>
    where
        T: Clone + Send + Sync + 'static,
    {
        // The map is only locked to find the slot. The computation runs
        // outside of it so that it can use this store itself.
        let slot = Slot::clone(self.slots.lock().entry(key).or_default());

        let mut compute = Some(compute);
        let entry = slot.get_or_try_init(|| match compute.take() {
            Some(compute) => compute().map(|output| Box::new(output) as Box<dyn Any + Send + Sync>),
            None => unreachable!("slot initializer runs at most once"),
        })?;

        if let Some(output) = entry.downcast_ref::<T>() {
            return Ok(Fetched { output: output.clone(), hit: compute.is_some() });
        }

        // Only reachable if another computation filled the slot, so `compute`
        // was not consumed.
        warn!(%key, "memoized entry has unexpected type");
        match compute {
            Some(compute) => compute().map(|output| Fetched { output, hit: false }),
            None => unreachable!("a freshly filled slot has the requested type"),
        }
    }
}

impl Debug for SharedStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("SharedStore").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn key(n: u32) -> Key {
        Key::new::<_, u32>("square", &(n,))
    }

    #[test]
    fn test_shared_store_memoizes() {
        let store = SharedStore::new();
        let first = store.get_or_try_insert_with(key(3), || Ok::<_, ()>(9u32));
        let second = store.get_or_try_insert_with(key(3), || Ok::<_, ()>(0u32));
        assert_eq!(first, Ok(Fetched { output: 9, hit: false }));
        assert_eq!(second, Ok(Fetched { output: 9, hit: true }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_shared_store_does_not_keep_errors() {
        let store = SharedStore::new();
        let failed = store.get_or_try_insert_with(key(4), || Err::<u32, _>("boom"));
        assert_eq!(failed, Err("boom"));
        assert!(store.is_empty());

        let retried = store.get_or_try_insert_with(key(4), || Ok::<_, &str>(16u32));
        assert_eq!(retried, Ok(Fetched { output: 16, hit: false }));
    }

    #[test]
    fn test_shared_store_type_mismatch_is_uncached() {
        let store = SharedStore::new();
        store.get_or_try_insert_with(key(5), || Ok::<_, ()>(25u32)).unwrap();
        let text = store
            .get_or_try_insert_with(key(5), || Ok::<_, ()>("twenty-five".to_string()))
            .unwrap();
        assert_eq!(text, Fetched { output: "twenty-five".to_string(), hit: false });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_shared_store_computes_once_across_threads() {
        let store = SharedStore::new();
        let calls = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let fetched = store
                        .get_or_try_insert_with(key(6), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(10));
                            Ok::<_, ()>(36u32)
                        })
                        .unwrap();
                    assert_eq!(fetched.output, 36);
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_shared_store_nested_keys() {
        let store = SharedStore::new();
        let outer = store
            .get_or_try_insert_with(key(7), || {
                let inner = store.get_or_try_insert_with(key(8), || Ok::<_, ()>(64u32))?;
                Ok::<_, ()>(inner.output - 15)
            })
            .unwrap();
        assert_eq!(outer.output, 49);
        assert_eq!(store.len(), 2);
    }
}
