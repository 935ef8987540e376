//! `Attachment` — the observer-side half of the notifier protocol.
//!
//! Each concrete observer embeds one `Attachment<N>` as a field.  The
//! attachment tracks which notifier (if any) the observer is currently on,
//! enforces the at-most-one-notifier rule, and detaches automatically when
//! the observer is dropped — so a notifier can never end up holding an
//! entry for a destroyed observer.
//!
//! ```rust,ignore
//! struct BoardWatcher {
//!     attachment: Attachment<dyn BoardNotifiee>,
//! }
//!
//! let watcher = Rc::new(BoardWatcher { attachment: Attachment::new() });
//! watcher.attachment.attach(board.notifier(), Rc::downgrade(&watcher));
//! ```

use std::cell::RefCell;
use std::rc::Weak;

use crate::Notifier;

/// Connection state between one observer and at most one [`Notifier`].
pub struct Attachment<N: ?Sized> {
    current: RefCell<Option<Link<N>>>,
}

struct Link<N: ?Sized> {
    notifier: Notifier<N>,
    token: u64,
}

impl<N: ?Sized> Attachment<N> {
    pub fn new() -> Self {
        Self { current: RefCell::new(None) }
    }

    /// Attach `observer` to `notifier`.
    ///
    /// Any prior attachment to a *different* notifier is removed first;
    /// attaching to the notifier the observer is already on is a no-op (the
    /// observer keeps its position in the delivery order).
    ///
    /// `observer` must be a weak reference to the observer embedding this
    /// attachment.
    pub fn attach(&self, notifier: &Notifier<N>, observer: Weak<N>) {
        let mut current = self.current.borrow_mut();
        if let Some(link) = current.as_ref() {
            if link.notifier.ptr_eq(notifier) {
                return;
            }
            link.notifier.remove(link.token);
        }
        let token = notifier.insert(observer);
        *current = Some(Link { notifier: notifier.clone(), token });
    }

    /// Remove this observer from its notifier's roster.  Idempotent.
    pub fn detach(&self) {
        if let Some(link) = self.current.borrow_mut().take() {
            link.notifier.remove(link.token);
        }
    }

    /// The notifier this observer is attached to, if any.
    pub fn notifier(&self) -> Option<Notifier<N>> {
        self.current
            .borrow()
            .as_ref()
            .map(|link| link.notifier.clone())
    }

    pub fn is_attached(&self) -> bool {
        self.current.borrow().is_some()
    }
}

impl<N: ?Sized> Default for Attachment<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: ?Sized> Drop for Attachment<N> {
    /// Destroying the observer detaches it.
    fn drop(&mut self) {
        self.detach();
    }
}
