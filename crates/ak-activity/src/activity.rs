//! `Activity` — a named, schedulable unit of deferred work.
//!
//! # State machine
//!
//! ```text
//!        set_next_time            manager pops due entry
//! idle ────────────────► scheduled ────────────────────┐
//!  │                                                   ▼
//!  │ first posting                                  running ──► stopped
//!  └──────────────────► ready ───────────────────────▲ │           ▲
//!                        (run-now priority)            │ drain ends │
//!        idle ◄────────────────────────────────────────┘    any state
//!        scheduled ◄── (wake time set during drain)
//! ```
//!
//! `stopped` is terminal: the queue is discarded, wake entries are purged,
//! and no further transitions are accepted.
//!
//! # Drain ordering
//!
//! While running, the activity repeatedly executes the oldest posting.
//! Postings appended to the queue *during* a reaction are causally part of
//! that reaction, so they are relocated ahead of everything that was
//! already waiting — in their own arrival order — before the next pop.
//! Each reaction runs inside a failure boundary: an `Err` is logged and the
//! drain continues with the next posting.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use ak_core::{Handle, Time, WeakHandle};
use ak_notify::Notifier;

use crate::element::{ActivityElement, ActivityNotifiee, Reaction};
use crate::manager::ActivityManager;
use crate::post::post;

// ── Status ────────────────────────────────────────────────────────────────────

/// Current status of an [`Activity`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Defensive sentinel; never a live value.
    #[default]
    Undefined,
    /// No pending work, no wake scheduled.
    Idle,
    /// A future wake time is set; present in the manager's wake structure.
    Scheduled,
    /// Has queued postings and awaits the manager, with run-now priority.
    Ready,
    /// Draining its posting queue.
    Running,
    /// Terminal; removed from scheduling consideration.
    Stopped,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Undefined => "undefined",
            Status::Idle      => "idle",
            Status::Scheduled => "scheduled",
            Status::Ready     => "ready",
            Status::Running   => "running",
            Status::Stopped   => "stopped",
        };
        f.write_str(name)
    }
}

// ── Activity ──────────────────────────────────────────────────────────────────

/// A named, independently schedulable unit of deferred work.
///
/// Created through [`ActivityManager::create`]; shared as
/// `Handle<Activity>`.  All mutation goes through `&self` — the kernel is
/// single-threaded and uses interior mutability throughout.
pub struct Activity {
    name: String,
    status: Cell<Status>,
    /// Wake time; meaningful only while `scheduled` is set.
    next_time: Cell<Time>,
    /// A wake time has been requested since the last run began.
    scheduled: Cell<bool>,
    /// When set, postings addressed to this activity run synchronously at
    /// post time instead of being queued.
    immediate_delivery: Cell<bool>,
    main: RefCell<Option<Rc<dyn ActivityElement>>>,
    queue: RefCell<VecDeque<Reaction>>,
    notifier: Notifier<dyn ActivityNotifiee>,
    /// Non-owning back-reference to the manager that owns this activity via
    /// its name table; must not be assumed live once the manager begins
    /// destruction.
    manager: WeakHandle<ActivityManager>,
    weak_self: WeakHandle<Activity>,
}

impl Activity {
    pub(crate) fn new(name: String, manager: WeakHandle<ActivityManager>) -> Handle<Activity> {
        let rc = Rc::new_cyclic(|weak| Activity {
            name,
            status: Cell::new(Status::Idle),
            next_time: Cell::new(Time::ZERO),
            scheduled: Cell::new(false),
            immediate_delivery: Cell::new(true),
            main: RefCell::new(None),
            queue: RefCell::new(VecDeque::new()),
            notifier: Notifier::new(),
            manager,
            weak_self: WeakHandle::from(weak.clone()),
        });
        Handle::from(rc)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Roster of observers of this activity's status and wake time.
    pub fn notifier(&self) -> &Notifier<dyn ActivityNotifiee> {
        &self.notifier
    }

    /// A fresh owning handle to this activity.
    pub fn handle(&self) -> Handle<Activity> {
        self.weak_self.upgrade()
    }

    // ── Status ────────────────────────────────────────────────────────────

    pub fn status(&self) -> Status {
        self.status.get()
    }

    /// Change the status, broadcasting to this activity's notifiees.
    ///
    /// Entering `Running` drains the posting queue before returning;
    /// entering `Stopped` discards pending postings and is terminal (later
    /// calls are no-ops).
    pub fn set_status(&self, status: Status) {
        let current = self.status.get();
        if current == status || current == Status::Stopped {
            return;
        }
        self.status.set(status);
        if status == Status::Running {
            // A fresh run resets the wake bookkeeping before observers
            // react, so a wake time set from the status broadcast or from a
            // reaction survives the run.
            self.scheduled.set(false);
            self.next_time.set(Time::ZERO);
        }
        post(&self.notifier, move |n| n.on_status(status));

        match status {
            Status::Running => self.deliver_all(),
            Status::Stopped => {
                self.queue.borrow_mut().clear();
                self.scheduled.set(false);
                let manager = self.manager.upgrade();
                if let Some(manager) = manager.as_rc() {
                    manager.unqueue(&self.handle());
                }
            }
            _ => {}
        }
    }

    // ── Wake time ─────────────────────────────────────────────────────────

    pub fn next_time(&self) -> Time {
        self.next_time.get()
    }

    /// Request a wake at absolute time `time`.
    ///
    /// Broadcasts a next-time notification; an idle activity transitions to
    /// `Scheduled` (with a status notification) and registers with the
    /// manager, an already-scheduled one is re-keyed at the new time.
    pub fn set_next_time(&self, time: Time) {
        if self.status.get() == Status::Stopped {
            return;
        }
        self.scheduled.set(true);
        self.next_time.set(time);
        post(&self.notifier, move |n| n.on_next_time(time));

        match self.status.get() {
            Status::Idle => {
                self.set_status(Status::Scheduled);
                self.register();
            }
            Status::Scheduled => self.register(),
            // Ready runs immediately anyway; a drain in progress re-registers
            // when it ends.
            _ => {}
        }
    }

    /// Request a wake `delta` units after the manager's current time.
    pub fn set_next_time_offset(&self, delta: u64) {
        let now = {
            let manager = self.manager.upgrade();
            match manager.as_rc() {
                Some(manager) => manager.now(),
                None          => Time::ZERO,
            }
        };
        self.set_next_time(now + delta);
    }

    // ── Main element ──────────────────────────────────────────────────────

    pub fn main(&self) -> Option<Rc<dyn ActivityElement>> {
        self.main.borrow().clone()
    }

    /// Designate `element` as this activity's main element and deliver its
    /// one-time `on_main` bootstrap: synchronously under immediate
    /// delivery, otherwise as a queued posting.
    pub fn set_main(&self, element: Rc<dyn ActivityElement>) {
        *self.main.borrow_mut() = Some(Rc::clone(&element));
        if self.immediate_delivery.get() {
            if let Err(error) = element.on_main() {
                tracing::error!(
                    activity = %self.name,
                    error = %error,
                    "bootstrap notification failed"
                );
                element.on_notification_error(&error);
            }
        } else {
            let reactor = element;
            self.posting_new(Box::new(move || {
                reactor.on_main().inspect_err(|error| {
                    reactor.on_notification_error(error);
                })
            }));
        }
    }

    // ── Delivery mode ─────────────────────────────────────────────────────

    pub fn immediate_delivery(&self) -> bool {
        self.immediate_delivery.get()
    }

    pub fn set_immediate_delivery(&self, flag: bool) {
        self.immediate_delivery.set(flag);
    }

    // ── Posting queue ─────────────────────────────────────────────────────

    pub fn posting_count(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Append a deferred reaction to the posting queue.
    ///
    /// An idle activity becomes `Ready` and registers with the manager for
    /// imminent execution.  Postings addressed to a stopped activity are
    /// dropped.
    pub fn posting_new(&self, reaction: Reaction) {
        if self.status.get() == Status::Stopped {
            return;
        }
        let became_first = {
            let mut queue = self.queue.borrow_mut();
            queue.push_back(reaction);
            queue.len() == 1
        };
        if became_first && self.status.get() == Status::Idle {
            // Quiet transition: ready/idle flips do not notify.
            self.status.set(Status::Ready);
            self.register();
        }
    }

    // ── Drain ─────────────────────────────────────────────────────────────

    fn deliver_all(&self) {
        while self.deliver_one() {}
    }

    /// Execute the posting at the queue front; `false` once the queue is
    /// empty and the activity has settled into its post-run status.
    fn deliver_one(&self) -> bool {
        let popped = self.queue.borrow_mut().pop_front();
        let Some(reaction) = popped else {
            if self.status.get() != Status::Stopped {
                if self.scheduled.get() {
                    self.status.set(Status::Scheduled);
                    self.register();
                } else {
                    self.status.set(Status::Idle);
                }
            }
            return false;
        };

        let waiting = self.queue.borrow().len();
        if let Err(error) = reaction() {
            tracing::error!(
                activity = %self.name,
                error = %error,
                "posting failed; continuing drain"
            );
        }

        // Postings the reaction just generated are continuations of "now":
        // move them ahead of the pre-existing tail, preserving their own
        // arrival order.  (A reaction that stopped this activity emptied the
        // queue instead; saturating_sub keeps that case at zero.)
        let mut queue = self.queue.borrow_mut();
        let appended = queue.len().saturating_sub(waiting);
        if appended > 0 {
            queue.rotate_right(appended);
        }
        true
    }

    /// Enter the manager's wake structure at the current `next_time`.
    fn register(&self) {
        let manager = self.manager.upgrade();
        if let Some(manager) = manager.as_rc() {
            manager.enqueue(&self.handle());
        }
    }
}

impl fmt::Debug for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activity")
            .field("name", &self.name)
            .field("status", &self.status.get())
            .field("next_time", &self.next_time.get())
            .field("postings", &self.queue.borrow().len())
            .finish()
    }
}
