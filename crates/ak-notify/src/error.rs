//! Notification delivery errors.
//!
//! These are *contained* errors: the dispatch and drain boundaries catch
//! them, log them, and report them to the failing observer only.  They never
//! propagate to the broadcaster or to sibling observers.

use thiserror::Error;

/// A failure raised by an observer's reaction during delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The reaction reported a specific failure.
    #[error("notification reaction failed: {0}")]
    Reaction(String),

    /// The reaction failed without a more specific classification.
    #[error("observer failed without a specific cause")]
    Unknown,
}

impl NotifyError {
    /// Shorthand for the common `Reaction(msg)` case.
    pub fn reaction(msg: impl Into<String>) -> Self {
        NotifyError::Reaction(msg.into())
    }
}

/// Result type returned by every notification hook.
pub type NotifyResult = Result<(), NotifyError>;
