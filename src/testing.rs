use std::cell::Cell;

thread_local! {
    /// Whether the most recent memoized call on this thread reused a result.
    static LAST_WAS_HIT: Cell<bool> = const { Cell::new(false) };
}

/// Whether the most recent memoized call on this thread was a cache hit.
pub fn last_was_hit() -> bool {
    LAST_WAS_HIT.get()
}

/// Records that a stored result was returned.
pub(crate) fn register_hit() {
    LAST_WAS_HIT.set(true);
}

/// Records that the function had to run.
pub(crate) fn register_miss() {
    LAST_WAS_HIT.set(false);
}
