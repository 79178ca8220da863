//! # Time
//!
//! Durations are integer milliseconds wrapped in [`Unit`]. A fixed-timestep
//! game loop does not need sub-millisecond precision, and integer ticks keep
//! accumulation exact where an `f32` seconds counter would drift.

use std::fmt;
use std::ops::{Add, AddAssign, Rem, Sub, SubAssign};
use std::sync::OnceLock;
use std::time::Instant;

/// A duration in whole milliseconds.
///
/// Subtraction saturates at zero rather than wrapping, so a frame-time
/// computation that briefly goes backwards clamps instead of exploding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unit(u64);

impl Unit {
    pub const ZERO: Unit = Unit(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Truncates toward zero. Negative inputs clamp to zero.
    pub fn from_secs(seconds: f32) -> Self {
        Self((seconds.max(0.0) * 1000.0) as u64)
    }

    pub const fn millis(self) -> u64 {
        self.0
    }

    pub fn secs(self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// Milliseconds elapsed since the first call in this process.
    pub fn now() -> Self {
        static START: OnceLock<Instant> = OnceLock::new();
        let start = START.get_or_init(Instant::now);
        Self(start.elapsed().as_millis() as u64)
    }
}

impl Add for Unit {
    type Output = Unit;
    fn add(self, rhs: Unit) -> Unit {
        Unit(self.0 + rhs.0)
    }
}

impl AddAssign for Unit {
    fn add_assign(&mut self, rhs: Unit) {
        self.0 += rhs.0;
    }
}

impl Sub for Unit {
    type Output = Unit;
    fn sub(self, rhs: Unit) -> Unit {
        Unit(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Unit {
    fn sub_assign(&mut self, rhs: Unit) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Rem for Unit {
    type Output = Unit;
    fn rem(self, rhs: Unit) -> Unit {
        Unit(self.0 % rhs.0)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Unit::from_millis(1500).secs(), 1.5);
        assert_eq!(Unit::from_secs(0.016).millis(), 16);
        assert_eq!(Unit::from_secs(-1.0), Unit::ZERO);
    }

    #[test]
    fn arithmetic_saturates_on_subtraction() {
        let a = Unit::from_millis(10);
        let b = Unit::from_millis(25);
        assert_eq!(a + b, Unit::from_millis(35));
        assert_eq!(b - a, Unit::from_millis(15));
        assert_eq!(a - b, Unit::ZERO);

        let mut acc = Unit::from_millis(5);
        acc += Unit::from_millis(11);
        acc -= Unit::from_millis(100);
        assert_eq!(acc, Unit::ZERO);
    }

    #[test]
    fn remainder_for_fixed_step_accumulators() {
        assert_eq!(Unit::from_millis(50) % Unit::from_millis(16), Unit::from_millis(2));
    }

    #[test]
    fn display() {
        assert_eq!(Unit::from_millis(123).to_string(), "123ms");
    }

    #[test]
    fn now_is_monotonic() {
        let a = Unit::now();
        let b = Unit::now();
        assert!(b >= a);
    }
}
