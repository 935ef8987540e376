//! Base error type.
//!
//! Sub-crates define their own error enums and either convert `AkError` into
//! them via `From` impls or wrap it as one variant.  Both patterns are
//! acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

/// The base error type for `ak-core`.
#[derive(Debug, Error)]
pub enum AkError {
    /// A null handle was dereferenced.
    #[error("null handle dereferenced: {0}")]
    NullReference(&'static str),
}

/// Shorthand result type for `ak-core` operations.
pub type AkResult<T> = Result<T, AkError>;
