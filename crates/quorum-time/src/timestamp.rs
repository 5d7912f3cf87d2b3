//! Overflow-safe monotonic timestamps
//!
//! A [`Timestamp`] wraps a raw nanosecond tick count. Two timestamps are
//! ordered by the sign of their wrapping difference, so ordering stays
//! correct when the counter wraps between samples. The technique holds as
//! long as the real time between two samples is under half the tick range
//! (roughly 146 years).

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;
use std::time::Duration;

use crate::clock::{MonotonicClock, SystemClock, NANOS_PER_MILLI};

/// Immutable point on the monotonic clock
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Current time from the system monotonic clock
    #[inline]
    pub fn now() -> Self {
        Self::now_from(&SystemClock)
    }

    /// Current time from an explicit clock source
    #[inline]
    pub fn now_from<C: MonotonicClock>(clock: &C) -> Self {
        Timestamp(clock.nanos())
    }

    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        Timestamp(nanos)
    }

    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// New timestamp `ms` milliseconds later (earlier if negative).
    ///
    /// Overflow wraps; it is resolved at comparison time.
    #[inline]
    pub const fn plus_millis(self, ms: i64) -> Self {
        Timestamp(self.0.wrapping_add(ms.wrapping_mul(NANOS_PER_MILLI)))
    }

    /// Signed nanoseconds from `earlier` to `self`
    #[inline]
    pub const fn nanos_since(self, earlier: Timestamp) -> i64 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Milliseconds elapsed since this timestamp on the system clock.
    ///
    /// Negative if the timestamp lies in the future.
    #[inline]
    pub fn elapsed_millis(self) -> i64 {
        self.elapsed_millis_from(&SystemClock)
    }

    /// Milliseconds elapsed since this timestamp on `clock`
    #[inline]
    pub fn elapsed_millis_from<C: MonotonicClock>(self, clock: &C) -> i64 {
        // Integer division truncates toward zero
        Timestamp(clock.nanos()).nanos_since(self) / NANOS_PER_MILLI
    }

    /// Overflow-safe three-way comparison
    #[inline]
    pub fn compare(a: &Timestamp, b: &Timestamp) -> Ordering {
        a.nanos_since(*b).cmp(&0)
    }

    /// The later of two timestamps; `b` on a tie
    #[inline]
    pub fn latest<'a>(a: &'a Timestamp, b: &'a Timestamp) -> &'a Timestamp {
        if Self::compare(a, b) == Ordering::Greater {
            a
        } else {
            b
        }
    }
}

impl Ord for Timestamp {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        Timestamp::compare(self, other)
    }
}

impl PartialOrd for Timestamp {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Nanosecond-precision offset. The duration is taken modulo 2^64, so
/// durations past `i64::MAX` ns wrap like the tick counter itself.
impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0.wrapping_add(rhs.as_nanos() as i64))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ns)", self.0)
    }
}
