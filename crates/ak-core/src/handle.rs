//! `Handle` — the kernel's shared, possibly-null object reference.
//!
//! # Ownership model
//!
//! Every heap object the kernel shares is owned collectively by the handles
//! that reference it: the object's live count equals the number of
//! outstanding `Handle`s, and dropping the last one finalizes the object
//! (its `Drop` impl runs) exactly once.  Cloning and dropping a handle are
//! the only operations that touch the count.
//!
//! A handle may also be *null* — referencing nothing — which is how lookups
//! report a miss without an `Option` wrapper at every call site.  Accessing
//! a null handle through [`Handle::try_ref`] fails with
//! [`AkError::NullReference`] instead of panicking.
//!
//! # Cycles
//!
//! No cycle detection is performed: a cyclic ownership graph leaks
//! permanently.  Breaking cycles is a caller obligation, done by making one
//! direction of the relationship a [`WeakHandle`] — a typed, non-owning
//! back-reference that never counts and yields a null handle once its owner
//! is gone.

use std::rc::{Rc, Weak};

use crate::error::{AkError, AkResult};

// ── Handle ───────────────────────────────────────────────────────────────────

/// A shared, possibly-null, reference-counted handle to `T`.
pub struct Handle<T: ?Sized> {
    inner: Option<Rc<T>>,
}

impl<T> Handle<T> {
    /// Allocate `value` and return the first handle to it.
    pub fn new(value: T) -> Self {
        Self { inner: Some(Rc::new(value)) }
    }

    /// A non-owning reference to the same object (dead weak for null).
    pub fn downgrade(&self) -> WeakHandle<T> {
        match &self.inner {
            Some(rc) => WeakHandle { inner: Rc::downgrade(rc) },
            None     => WeakHandle::dead(),
        }
    }
}

impl<T: ?Sized> Handle<T> {
    /// A handle referencing nothing.
    pub fn null() -> Self {
        Self { inner: None }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Number of live handles to the referenced object; 0 for a null handle.
    pub fn references(&self) -> usize {
        match &self.inner {
            Some(rc) => Rc::strong_count(rc),
            None     => 0,
        }
    }

    /// Checked dereference; the error names the referenced type.
    pub fn try_ref(&self) -> AkResult<&T> {
        match &self.inner {
            Some(rc) => Ok(rc),
            None     => Err(AkError::NullReference(std::any::type_name::<T>())),
        }
    }

    /// The underlying `Rc`, or `None` for a null handle.
    ///
    /// Prefer [`Handle::try_ref`] where a miss is an error; use this where
    /// null is an expected, silently-handled case.
    pub fn as_rc(&self) -> Option<&Rc<T>> {
        self.inner.as_ref()
    }

    /// Identity comparison: both null, or both referencing the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None)       => true,
            _                  => false,
        }
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: ?Sized> Default for Handle<T> {
    /// Returns the null handle so uninitialized slots are visibly empty.
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> From<Rc<T>> for Handle<T> {
    fn from(rc: Rc<T>) -> Self {
        Self { inner: Some(rc) }
    }
}

impl<T: ?Sized> PartialEq for Handle<T> {
    /// Identity equality, same as [`Handle::ptr_eq`].
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: ?Sized> Eq for Handle<T> {}

impl<T: ?Sized> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(rc) => write!(f, "Handle({:p})", Rc::as_ptr(rc)),
            None     => write!(f, "Handle(null)"),
        }
    }
}

// ── WeakHandle ───────────────────────────────────────────────────────────────

/// A typed non-owning back-reference to an object owned elsewhere.
///
/// Does not keep the object alive and must never be assumed valid after the
/// owner begins destruction: [`WeakHandle::upgrade`] returns a null handle
/// once the last owning [`Handle`] is gone.
pub struct WeakHandle<T: ?Sized> {
    inner: Weak<T>,
}

impl<T> WeakHandle<T> {
    /// A back-reference that was never attached to an owner.
    pub fn dead() -> Self {
        Self { inner: Weak::new() }
    }
}

impl<T: ?Sized> WeakHandle<T> {
    /// Reacquire ownership if the object is still alive; null handle if not.
    pub fn upgrade(&self) -> Handle<T> {
        Handle { inner: self.inner.upgrade() }
    }
}

impl<T: ?Sized> Clone for WeakHandle<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T> Default for WeakHandle<T> {
    fn default() -> Self {
        Self::dead()
    }
}

impl<T: ?Sized> From<Weak<T>> for WeakHandle<T> {
    fn from(weak: Weak<T>) -> Self {
        Self { inner: weak }
    }
}
