//! `ak-notify` — the notifier/notifiee attachment protocol.
//!
//! # Crate layout
//!
//! | Module         | Contents                                        |
//! |----------------|-------------------------------------------------|
//! | [`notifier`]   | `Notifier<N>` — ordered, weakly-held roster     |
//! | [`attachment`] | `Attachment<N>` — observer-side connection      |
//! | [`error`]      | `NotifyError`, `NotifyResult`                   |
//!
//! # Protocol (summary)
//!
//! A notifier object embeds a `Notifier<N>` for its observer trait `N`; each
//! observer embeds an `Attachment<N>` and attaches with a weak reference to
//! itself.  An observer is on at most one notifier: attaching elsewhere
//! implicitly detaches, dropping the observer detaches, and `detach` is
//! idempotent.  Broadcast code (see `ak-activity`) iterates a snapshot of
//! the roster so observers may attach and detach freely from inside their
//! own reactions.
//!
//! Observer traits define one method per notification kind, each returning
//! [`NotifyResult`] with a default `Ok(())` body, so implementors override
//! only the notifications of interest.

pub mod attachment;
pub mod error;
pub mod notifier;

#[cfg(test)]
mod tests;

pub use attachment::Attachment;
pub use error::{NotifyError, NotifyResult};
pub use notifier::Notifier;
