use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;

use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::function::Function;
use crate::key::Key;
use crate::store::{Lookup, Store};

/// Wrap a function so that its results are memoized in `store`.
///
/// The `name` identifies the function within the store and is compared
/// case-insensitively. Two wrappers with the same name and argument types
/// share their results, so every distinct function needs its own name.
///
/// ```
/// use cacher::{wrap, Store};
///
/// let store = Store::new();
/// let add = wrap("add", &store, |a: u32, b: u32| a + b)?;
/// assert_eq!(add.call((10, 20)), 30);
/// assert_eq!(add.call((10, 20)), 30); // Not recomputed.
/// # Ok::<(), cacher::Error>(())
/// ```
///
/// Returns [`Error::InvalidName`] if the name is empty or only whitespace.
pub fn wrap<'s, F>(name: &str, store: &'s Store, func: F) -> Result<Memoized<'s, F>> {
    if name.trim().is_empty() {
        return Err(Error::InvalidName { name: name.into() });
    }

    Ok(Memoized {
        name: name.to_lowercase().into(),
        func,
        store,
        enabled: true,
    })
}

impl Store {
    /// Wrap a function so that its results are memoized in this store.
    ///
    /// See [`wrap`] for details.
    pub fn wrap<F>(&self, name: &str, func: F) -> Result<Memoized<'_, F>> {
        wrap(name, self, func)
    }
}

/// A memoized function.
///
/// Created by [`wrap`]. Call it with [`call`](Self::call), or with
/// [`try_call`](Self::try_call) if the function is fallible.
pub struct Memoized<'s, F> {
    /// The lower-cased name of the function.
    name: Box<str>,
    /// The wrapped function.
    func: F,
    /// Where results are memoized.
    store: &'s Store,
    /// Whether results are looked up and stored at all.
    enabled: bool,
}

impl<'s, F> Memoized<'s, F> {
    /// The lower-cased name under which results are stored.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enable or disable memoization.
    ///
    /// A disabled wrapper always calls through to the function and neither
    /// reads nor writes its store.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Call the function or reuse the result of an earlier call with the
    /// same arguments.
    ///
    /// The function's output is cloned out of the store on every hit. If the
    /// function panics, the panic is propagated and nothing is stored.
    pub fn call<A>(&self, args: A) -> F::Output
    where
        A: Hash,
        F: Function<A>,
        F::Output: Clone + 'static,
    {
        match self.memoized(args, |func, args| Ok::<_, Infallible>(func.invoke(args))) {
            Ok(output) => output,
            Err(never) => match never {},
        }
    }

    /// Call a fallible function or reuse the result of an earlier successful
    /// call with the same arguments.
    ///
    /// Only `Ok` values are memoized. An error is returned as is and leaves
    /// the store untouched, so the next call with the same arguments tries
    /// again.
    ///
    /// ```
    /// use cacher::Store;
    ///
    /// let store = Store::new();
    /// let parse = store.wrap("parse", |text: &str| text.parse::<i32>())?;
    /// assert!(parse.try_call(("x",)).is_err());
    /// assert_eq!(parse.try_call(("7",)), Ok(7));
    /// assert_eq!(store.len(), 1);
    /// # Ok::<(), cacher::Error>(())
    /// ```
    pub fn try_call<A, T, E>(&self, args: A) -> Result<T, E>
    where
        A: Hash,
        F: Function<A, Output = Result<T, E>>,
        T: Clone + 'static,
    {
        self.memoized(args, |func, args| func.invoke(args))
    }

    /// Look up the result for `args` or compute and store it.
    fn memoized<A, T, E>(
        &self,
        args: A,
        compute: impl FnOnce(&F, A) -> Result<T, E>,
    ) -> Result<T, E>
    where
        A: Hash,
        T: Clone + 'static,
    {
        // Early bypass if memoization is disabled.
        if !self.enabled {
            let output = compute(&self.func, args);

            #[cfg(feature = "testing")]
            crate::testing::register_miss();

            return output;
        }

        let key = Key::new::<A, T>(&self.name, &args);

        let cacheable = match self.store.lookup::<T>(key) {
            Lookup::Hit(output) => {
                trace!(name = %self.name, %key, "memoized call hit");

                #[cfg(feature = "testing")]
                crate::testing::register_hit();

                return Ok(output);
            }
            Lookup::Miss => true,
            Lookup::Mismatch => {
                warn!(name = %self.name, %key, "memoized entry has unexpected type");
                false
            }
        };

        trace!(name = %self.name, %key, "memoized call miss");

        // The store is not borrowed here, so the function may call other
        // memoized functions on the same store.
        let output = compute(&self.func, args)?;
        if cacheable {
            self.store.insert(key, output.clone());
        }

        #[cfg(feature = "testing")]
        crate::testing::register_miss();

        Ok(output)
    }
}

impl<F> Debug for Memoized<'_, F> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_wrap_rejects_blank_names() {
        let store = Store::new();
        assert_eq!(
            wrap("", &store, || 1).unwrap_err(),
            Error::InvalidName { name: String::new() },
        );
        assert!(wrap("  \t", &store, || 1).is_err());
    }

    #[test]
    fn test_wrap_lowercases_name() {
        let store = Store::new();
        let upper = store.wrap("Double", |x: u32| 2 * x).unwrap();
        assert_eq!(upper.name(), "double");

        let calls = Cell::new(0);
        let lower = store
            .wrap("double", |x: u32| {
                calls.set(calls.get() + 1);
                2 * x
            })
            .unwrap();

        assert_eq!(upper.call((4,)), 8);
        assert_eq!(lower.call((4,)), 8);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_nullary_function() {
        let store = Store::new();
        let calls = Cell::new(0);
        let empty = store
            .wrap("empty", || {
                calls.set(calls.get() + 1);
                format!("The world is {}", "big")
            })
            .unwrap();

        assert_eq!(empty.call(()), "The world is big");
        assert_eq!(empty.call(()), "The world is big");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_disabled_wrapper_skips_store() {
        let store = Store::new();
        let calls = Cell::new(0);
        let double = store
            .wrap("double", |x: u32| {
                calls.set(calls.get() + 1);
                2 * x
            })
            .unwrap()
            .enabled(false);

        assert_eq!(double.call((2,)), 4);
        assert_eq!(double.call((2,)), 4);
        assert_eq!(calls.get(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_debug() {
        let store = Store::new();
        let double = store.wrap("Double", |x: u32| 2 * x).unwrap();
        assert_eq!(
            format!("{double:?}"),
            r#"Memoized { name: "double", enabled: true, .. }"#
        );
    }
}
