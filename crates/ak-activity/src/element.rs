//! The reactor traits: `ActivityElement` and the activity's own notifiee.
//!
//! # Routing
//!
//! Every observer the dispatcher can deliver to is an [`ActivityElement`]:
//! it names the activity its notifications route through (a null handle
//! means every delivery is synchronous), receives the one-time `on_main`
//! bootstrap when designated as an activity's main element, and gets the
//! `on_notification_error` callback when one of its own reactions fails.
//!
//! Domain observer traits extend `ActivityElement` and add one method per
//! notification kind, each defaulting to `Ok(())` so implementors override
//! only what they care about.  [`ActivityNotifiee`] is the kernel's own
//! instance of that pattern, for observers of an activity's status and
//! wake-time attributes.

use std::rc::Rc;

use ak_core::{Handle, Time};
use ak_notify::{NotifyError, NotifyResult};

use crate::activity::{Activity, Status};

// ── ActivityElement ───────────────────────────────────────────────────────────

/// An object that can receive notifications, deferred through an activity
/// or delivered synchronously.
pub trait ActivityElement {
    /// The activity notifications to this element are routed through.
    ///
    /// A null handle (the default) means synchronous delivery.
    fn activity(&self) -> Handle<Activity> {
        Handle::null()
    }

    /// One-time bootstrap notification, delivered when this element becomes
    /// an activity's main element.
    fn on_main(&self) -> NotifyResult {
        Ok(())
    }

    /// One of this element's own reactions failed during delivery.
    ///
    /// The failure was already contained and logged by the dispatch or
    /// drain boundary; this hook is the element's chance to react.
    fn on_notification_error(&self, _error: &NotifyError) {}
}

/// A deferred, zero-argument reaction awaiting execution on an activity's
/// queue.  The closure owns a strong handle to its reactor, which is what
/// keeps the reactor alive while the posting waits.
pub type Reaction = Box<dyn FnOnce() -> NotifyResult>;

// ── ActivityNotifiee ──────────────────────────────────────────────────────────

/// Observer of an activity's own attribute changes.
pub trait ActivityNotifiee: ActivityElement {
    /// The activity's status changed to `status`.
    fn on_status(&self, _status: Status) -> NotifyResult {
        Ok(())
    }

    /// The activity's wake time changed to `time`.
    fn on_next_time(&self, _time: Time) -> NotifyResult {
        Ok(())
    }
}

/// A disposable element that runs one closure as its bootstrap and holds a
/// fixed activity binding.  Convenience for `set_main`-style one-shot
/// reactions in demos and tests.
pub struct MainFn<F: Fn() -> NotifyResult> {
    activity: Handle<Activity>,
    body: F,
}

impl<F: Fn() -> NotifyResult> MainFn<F> {
    pub fn new(activity: Handle<Activity>, body: F) -> Rc<Self> {
        Rc::new(Self { activity, body })
    }
}

impl<F: Fn() -> NotifyResult> ActivityElement for MainFn<F> {
    fn activity(&self) -> Handle<Activity> {
        self.activity.clone()
    }

    fn on_main(&self) -> NotifyResult {
        (self.body)()
    }
}
