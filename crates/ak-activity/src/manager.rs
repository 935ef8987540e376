//! `ActivityManager` — the authority over logical time and activity wake-up.
//!
//! # Wake structure
//!
//! Due activities are held in a `BTreeMap<Time, VecDeque<Handle<Activity>>>`:
//! the map orders wake times, the deque orders activities *within* one wake
//! time by registration (push-back / pop-front).  Registration order is the
//! documented tie-break for equal wake times, so runs are deterministic.
//!
//! The structure holds at most one entry per activity —
//! [`ActivityManager::enqueue`] purges any previous entry first — and
//! [`ActivityManager::advance_to`] additionally skips entries whose activity
//! has left the `Scheduled`/`Ready` states in the meantime.
//!
//! # Time
//!
//! `now` is monotonically non-decreasing.  `advance_to(t)` runs every due
//! activity in wake-time order, moving `now` up to each activity's wake time
//! as it runs, and finally settles at `max(now, t)` — a `t` in the past runs
//! nothing and leaves the clock untouched.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use ak_core::{Handle, Time, WeakHandle};

use crate::activity::{Activity, Status};
use crate::error::{ActivityError, ActivityResult};

// ── ActivityManager ───────────────────────────────────────────────────────────

/// Owner of a set of named activities and of the logical clock that drives
/// them.  Construct with [`ActivityManager::new`] and pass the handle to
/// every component that schedules or observes activities.
pub struct ActivityManager {
    /// Name table; owns every activity created through this manager.
    activities: RefCell<HashMap<String, Handle<Activity>>>,
    /// Wake structure: due activities keyed by wake time, FIFO within a key.
    wake: RefCell<BTreeMap<Time, VecDeque<Handle<Activity>>>>,
    now: Cell<Time>,
    /// Diagnostic side channel: log each activity run with its wake time.
    verbose: Cell<bool>,
    weak_self: WeakHandle<ActivityManager>,
}

impl ActivityManager {
    pub fn new() -> Handle<ActivityManager> {
        Handle::from(Rc::new_cyclic(|weak| ActivityManager {
            activities: RefCell::new(HashMap::new()),
            wake: RefCell::new(BTreeMap::new()),
            now: Cell::new(Time::ZERO),
            verbose: Cell::new(false),
            weak_self: WeakHandle::from(weak.clone()),
        }))
    }

    // ── Name table ────────────────────────────────────────────────────────

    /// Create an idle activity registered under `name`.
    pub fn create(&self, name: &str) -> ActivityResult<Handle<Activity>> {
        let mut activities = self.activities.borrow_mut();
        if activities.contains_key(name) {
            return Err(ActivityError::NameInUse(name.to_string()));
        }
        let activity = Activity::new(name.to_string(), self.weak_self.clone());
        activities.insert(name.to_string(), activity.clone());
        Ok(activity)
    }

    /// The activity registered under `name`; a null handle on a miss.
    pub fn lookup(&self, name: &str) -> Handle<Activity> {
        self.activities
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove and discard the named activity.
    ///
    /// The activity is stopped: pending postings are dropped — never
    /// delivered — and its wake entry is purged.  A miss is a no-op.
    pub fn remove(&self, name: &str) {
        let removed = self.activities.borrow_mut().remove(name);
        if let Some(activity) = removed {
            if let Some(activity) = activity.as_rc() {
                activity.set_status(Status::Stopped);
            }
        }
    }

    /// Number of registered activities.
    pub fn activity_count(&self) -> usize {
        self.activities.borrow().len()
    }

    // ── Wake structure ────────────────────────────────────────────────────

    /// Insert `activity` into the wake structure keyed by its current
    /// `next_time`, replacing any previous entry for the same activity.
    pub fn enqueue(&self, activity: &Handle<Activity>) {
        let Some(rc) = activity.as_rc() else { return };
        let time = rc.next_time();
        self.unqueue(activity);
        self.wake
            .borrow_mut()
            .entry(time)
            .or_default()
            .push_back(activity.clone());
    }

    /// Drop any wake entry for `activity`.
    pub(crate) fn unqueue(&self, activity: &Handle<Activity>) {
        let mut wake = self.wake.borrow_mut();
        for bucket in wake.values_mut() {
            bucket.retain(|entry| !entry.ptr_eq(activity));
        }
        wake.retain(|_, bucket| !bucket.is_empty());
    }

    // ── Logical time ──────────────────────────────────────────────────────

    pub fn now(&self) -> Time {
        self.now.get()
    }

    /// Advance logical time to `t`, running every activity whose wake time
    /// is at or before `t`, in wake-time order (registration order among
    /// equal times).
    ///
    /// Each due activity is transitioned to `Running` and drained to
    /// completion before the next one is considered, so work an activity
    /// generates for a time at or before `t` still runs within this call.
    pub fn advance_to(&self, t: Time) {
        loop {
            let due = self.pop_due(t);
            let Some((time, activity)) = due else { break };

            if self.now.get() < time {
                self.now.set(time);
            }
            let Some(activity) = activity.as_rc() else { continue };
            match activity.status() {
                Status::Scheduled | Status::Ready => {}
                // Stale entry; the activity moved on since registration.
                _ => continue,
            }
            if self.verbose.get() {
                tracing::info!(
                    activity = activity.name(),
                    time = %time,
                    "running activity"
                );
            }
            activity.set_status(Status::Running);
        }

        if self.now.get() < t {
            self.now.set(t);
        }
    }

    /// Pop the earliest wake entry at or before `t`, if any.
    fn pop_due(&self, t: Time) -> Option<(Time, Handle<Activity>)> {
        let mut wake = self.wake.borrow_mut();
        match wake.first_entry() {
            Some(mut entry) if *entry.key() <= t => {
                let time = *entry.key();
                let activity = entry.get_mut().pop_front();
                if entry.get().is_empty() {
                    entry.remove();
                }
                activity.map(|a| (time, a))
            }
            _ => None,
        }
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    pub fn verbose(&self) -> bool {
        self.verbose.get()
    }

    pub fn set_verbose(&self, flag: bool) {
        self.verbose.set(flag);
    }
}

// ── Default instance ──────────────────────────────────────────────────────────

thread_local! {
    static DEFAULT_MANAGER: RefCell<Handle<ActivityManager>> =
        RefCell::new(Handle::null());
}

/// Install `manager` as the default instance returned by
/// [`default_manager`].
///
/// There is no implicit first-use construction: until this runs, the
/// default is a null handle.  Stored per-thread because kernel types are
/// deliberately not `Send`.
pub fn set_default_manager(manager: &Handle<ActivityManager>) {
    DEFAULT_MANAGER.with(|slot| *slot.borrow_mut() = manager.clone());
}

/// The default manager installed by [`set_default_manager`]; a null handle
/// until then.
pub fn default_manager() -> Handle<ActivityManager> {
    DEFAULT_MANAGER.with(|slot| slot.borrow().clone())
}
