//! `Notifier` — an ordered roster of attached observers.
//!
//! # Design
//!
//! A domain object that announces attribute changes embeds one `Notifier<N>`
//! per observer trait `N` (e.g. `Notifier<dyn ShuttleNotifiee>`).  Observers
//! attach through an [`Attachment`][crate::Attachment]; broadcast code asks
//! the notifier for a [`snapshot`][Notifier::snapshot] and delivers to each
//! entry in attachment order.
//!
//! Two properties drive the representation:
//!
//! - **Observers are held weakly.**  The roster must never keep an observer
//!   alive, and destroying an observer must never leave a dangling entry.
//!   Entries that fail to upgrade are pruned during `snapshot`.
//! - **The roster is shared.**  The notifier clones cheaply
//!   (`Rc<RefCell<…>>` inside) so an attachment can reach the same roster
//!   later to detach, regardless of where the owning object moved.
//!
//! Mutation during broadcast is safe by construction: delivery iterates a
//! snapshot, so an observer that attaches or detaches mid-broadcast affects
//! the next broadcast, not the current one — and removal of the current
//! entry can neither skip nor duplicate the remaining ones.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

// ── Roster internals ──────────────────────────────────────────────────────────

struct Entry<N: ?Sized> {
    /// Token identifying this attachment for removal.
    id: u64,
    observer: Weak<N>,
}

struct Roster<N: ?Sized> {
    entries: Vec<Entry<N>>,
    next_id: u64,
}

// ── Notifier ──────────────────────────────────────────────────────────────────

/// An ordered collection of observers of hook trait `N`.
///
/// Delivery order is attachment order.  Cheap to clone; all clones share one
/// roster.
pub struct Notifier<N: ?Sized> {
    inner: Rc<RefCell<Roster<N>>>,
}

impl<N: ?Sized> Notifier<N> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Roster { entries: Vec::new(), next_id: 0 })),
        }
    }

    /// Number of live observers currently attached.
    pub fn len(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.observer.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strong references to all live observers, in attachment order.
    ///
    /// Entries whose observer has been destroyed are pruned as a side
    /// effect, so the roster never accumulates dead weight.
    pub fn snapshot(&self) -> Vec<Rc<N>> {
        let mut roster = self.inner.borrow_mut();
        roster.entries.retain(|e| e.observer.strong_count() > 0);
        roster
            .entries
            .iter()
            .filter_map(|e| e.observer.upgrade())
            .collect()
    }

    /// `true` if both notifiers share one roster.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Append `observer` to the roster; returns the removal token.
    pub(crate) fn insert(&self, observer: Weak<N>) -> u64 {
        let mut roster = self.inner.borrow_mut();
        let id = roster.next_id;
        roster.next_id += 1;
        roster.entries.push(Entry { id, observer });
        id
    }

    /// Remove the entry with the given token, if still present.
    pub(crate) fn remove(&self, id: u64) {
        self.inner.borrow_mut().entries.retain(|e| e.id != id);
    }
}

impl<N: ?Sized> Clone for Notifier<N> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<N: ?Sized> Default for Notifier<N> {
    fn default() -> Self {
        Self::new()
    }
}
