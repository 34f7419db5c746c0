use thiserror::Error;

/// A specialized result type for cacher operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while setting up memoization.
///
/// Failures of the memoized functions themselves are never wrapped in this
/// type. They are handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The namespace given to [`wrap`](crate::wrap) is empty or only
    /// whitespace, so it cannot tell cached functions apart.
    #[error("invalid memoization name {name:?}: must not be empty")]
    InvalidName { name: String },
}
