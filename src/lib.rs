//! Memoization of pure functions.
//!
//! A memoized function remembers its results keyed by its name and its
//! arguments, so a repeated call with the same arguments returns the stored
//! result instead of running the function again. Results are never evicted.
//!
//! There are two ways to memoize:
//!
//! - [`wrap`] a closure or function with an explicit name and a [`Store`]
//!   that holds the results. Stores are single-threaded and independent of
//!   each other.
//! - Annotate a free function with [`#[memoize]`](macro@memoize). Its name is
//!   taken from the function and its results go to one process-wide,
//!   thread-safe store.
//!
//! Errors returned by a fallible function are passed through and never
//! stored, so calling again retries the computation.
//!
//! ```
//! use std::cell::Cell;
//! use cacher::Store;
//!
//! let store = Store::new();
//! let calls = Cell::new(0);
//! let add = store.wrap("add", |a: u32, b: u32| {
//!     calls.set(calls.get() + 1);
//!     a + b
//! })?;
//!
//! assert_eq!(add.call((20, 30)), 50);
//! assert_eq!(add.call((20, 30)), 50);
//! assert_eq!(calls.get(), 1);
//! # Ok::<(), cacher::Error>(())
//! ```

mod error;
mod function;
mod global;
mod key;
mod memoize;
mod shared;
mod store;
#[cfg(feature = "testing")]
mod testing;

pub use crate::error::{Error, Result};
pub use crate::function::Function;
pub use crate::key::Key;
pub use crate::memoize::{Memoized, wrap};
pub use crate::shared::{Fetched, SharedStore};
pub use crate::store::Store;

#[cfg(feature = "macros")]
pub use cacher_macros::memoize;

/// These are implementation details. Do not rely on them!
#[doc(hidden)]
pub mod internal {
    pub use crate::global::{assert_hashable, memoized, memoized_fallible};

    #[cfg(feature = "testing")]
    pub use crate::testing::last_was_hit;
}
