use thiserror::Error;

/// Errors surfaced by cache lookups.
///
/// `KeyNotFound` is the only domain error: it is returned by `get` and `peek`
/// when the requested key is absent. Every other absent-key situation is a
/// no-op or a boolean result, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The requested key is not present in the cache.
    #[error("key not found")]
    KeyNotFound,
}
