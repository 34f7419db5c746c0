use std::convert::Infallible;
use std::hash::Hash;

use once_cell::sync::Lazy;
use tracing::trace;

use crate::key::Key;
use crate::shared::{Fetched, SharedStore};

/// The process-wide store used by `#[memoize]` functions.
static GLOBAL: Lazy<SharedStore> = Lazy::new(SharedStore::new);

/// Ensure a type is suitable as an argument of a memoized function.
pub fn assert_hashable<T: Hash + ?Sized>() {}

/// Execute a function or reuse a globally memoized result for it.
///
/// The `name` must already be lower-cased.
pub fn memoized<A, Out>(name: &str, args: A, func: impl FnOnce(A) -> Out) -> Out
where
    A: Hash,
    Out: Clone + Send + Sync + 'static,
{
    match fetch(name, args, |args| Ok::<_, Infallible>(func(args))) {
        Ok(output) => output,
        Err(never) => match never {},
    }
}

/// Execute a fallible function or reuse a globally memoized successful
/// result for it. Errors are never memoized.
pub fn memoized_fallible<A, T, E>(
    name: &str,
    args: A,
    func: impl FnOnce(A) -> Result<T, E>,
) -> Result<T, E>
where
    A: Hash,
    T: Clone + Send + Sync + 'static,
{
    fetch(name, args, func)
}

fn fetch<A, T, E>(
    name: &str,
    args: A,
    func: impl FnOnce(A) -> Result<T, E>,
) -> Result<T, E>
where
    A: Hash,
    T: Clone + Send + Sync + 'static,
{
    let key = Key::new::<A, T>(name, &args);
    let result = GLOBAL.get_or_try_insert_with(key, || func(args));

    let Fetched { output, hit } = match result {
        Ok(fetched) => fetched,
        Err(err) => {
            trace!(name, %key, "memoized call failed");

            #[cfg(feature = "testing")]
            crate::testing::register_miss();

            return Err(err);
        }
    };

    trace!(name, %key, hit, "memoized call");

    #[cfg(feature = "testing")]
    if hit {
        crate::testing::register_hit();
    } else {
        crate::testing::register_miss();
    }

    Ok(output)
}
