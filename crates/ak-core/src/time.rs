//! Logical time model.
//!
//! # Design
//!
//! Time is represented as a monotonically non-decreasing `Time` counter held
//! by the activity manager; `Time` itself is just an absolute timestamp in
//! abstract units.  Using an integer as the canonical unit means all wake-up
//! arithmetic is exact (no floating-point drift), comparisons are O(1), and
//! timestamps can key ordered maps directly.
//!
//! What one unit means (a second, an hour) is up to the application; the
//! kernel only ever compares and adds.

use std::fmt;

// ── Time ─────────────────────────────────────────────────────────────────────

/// An absolute logical timestamp.
///
/// Stored as `u64` to avoid overflow: at one unit per nanosecond a u64 lasts
/// ~585 years, and kernel time normally advances far more coarsely.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    /// Return the timestamp `n` units after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Time {
        Time(self.0 + n)
    }

    /// Units elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Time) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Time {
    type Output = Time;
    #[inline]
    fn add(self, rhs: u64) -> Time {
        Time(self.0 + rhs)
    }
}

impl std::ops::Sub for Time {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Time) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}
