//! `ak-core` — foundational types for the `rust_ak` activity kernel.
//!
//! This crate is a dependency of every other `ak-*` crate.  It intentionally
//! has no `ak-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                    |
//! |------------|---------------------------------------------|
//! | [`time`]   | `Time` — absolute logical timestamps        |
//! | [`handle`] | `Handle<T>`, `WeakHandle<T>`                |
//! | [`error`]  | `AkError`, `AkResult`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                         |
//! |---------|------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `Time`.      |

pub mod error;
pub mod handle;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{AkError, AkResult};
pub use handle::{Handle, WeakHandle};
pub use time::Time;
