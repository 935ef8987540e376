//! `ak-activity` — activities, the activity manager, and the broadcast
//! dispatcher.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`element`] | `ActivityElement`, `ActivityNotifiee`, `Reaction`       |
//! | [`activity`]| `Activity`, `Status`, the posting queue and drain       |
//! | [`manager`] | `ActivityManager`, wake structure, the default instance |
//! | [`post`]    | `post` — the broadcast dispatcher                       |
//! | [`error`]   | `ActivityError`, `ActivityResult`                       |
//!
//! # Control flow (summary)
//!
//! ```text
//! domain code ──► manager.create("name") ─► Activity (idle)
//! domain notifier ──► post(notifier, selector)
//!     per observer: sync call, or posting on its bound activity
//! manager.advance_to(t)
//!     pops due activities in time order ─► status = running
//!     running drains the posting queue (reentrant postings first)
//!     drained ─► idle, or scheduled again if a wake time was set
//! ```
//!
//! The model is cooperative and single-threaded: one activity's drain runs
//! to completion — including recursively triggered broadcasts — before the
//! manager proceeds to the next due activity.
//!
//! # Cargo features
//!
//! | Feature | Effect                                             |
//! |---------|----------------------------------------------------|
//! | `serde` | Serde derives on `Status` (and `ak-core`'s `Time`). |

pub mod activity;
pub mod element;
pub mod error;
pub mod manager;
pub mod post;


pub use activity::{Activity, Status};
pub use element::{ActivityElement, ActivityNotifiee, MainFn, Reaction};
pub use error::{ActivityError, ActivityResult};
pub use manager::{ActivityManager, default_manager, set_default_manager};
pub use post::post;
