//! Monotonic tick sources for Quorum timestamps

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

/// Nanoseconds in one millisecond
pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// Source of monotonic ticks, scaled to nanoseconds.
///
/// Readings never run backward in real time, but the 64-bit value is allowed
/// to wrap past `i64::MAX`. Consumers must compare readings by signed
/// difference, never by raw value.
pub trait MonotonicClock: Send + Sync {
    /// Current tick count in nanoseconds
    fn nanos(&self) -> i64;
}

/// Fixed at the first clock read of the process
static PROCESS_BASE: Lazy<Instant> = Lazy::new(Instant::now);

/// The host's monotonic clock (`std::time::Instant`)
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        SystemClock
    }
}

impl MonotonicClock for SystemClock {
    #[inline]
    fn nanos(&self) -> i64 {
        // Truncation wraps like a native 64-bit counter would
        PROCESS_BASE.elapsed().as_nanos() as i64
    }
}

/// Manually driven clock for tests and simulation
///
/// Starts anywhere in the tick range, including just below the overflow
/// point, and wraps on every advance.
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        ManualClock {
            ticks: AtomicI64::new(start),
        }
    }

    /// Clock positioned `nanos_before` ticks below the overflow point
    pub fn near_overflow(nanos_before: i64) -> Self {
        Self::new(i64::MAX.wrapping_sub(nanos_before))
    }

    /// Jump to an absolute tick value
    pub fn set(&self, nanos: i64) {
        self.ticks.store(nanos, Ordering::SeqCst);
    }

    /// Advance by a duration; returns the new tick value.
    ///
    /// The nanosecond count is taken modulo 2^64, so durations past
    /// `i64::MAX` ns wrap like the tick counter itself.
    pub fn advance(&self, dt: Duration) -> i64 {
        self.advance_nanos(dt.as_nanos() as i64)
    }

    /// Advance by whole milliseconds; returns the new tick value
    pub fn advance_millis(&self, ms: i64) -> i64 {
        self.advance_nanos(ms.wrapping_mul(NANOS_PER_MILLI))
    }

    fn advance_nanos(&self, nanos: i64) -> i64 {
        // fetch_add wraps on overflow
        self.ticks
            .fetch_add(nanos, Ordering::SeqCst)
            .wrapping_add(nanos)
    }
}

impl MonotonicClock for ManualClock {
    #[inline]
    fn nanos(&self) -> i64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_non_decreasing() {
        let clock = SystemClock::new();

        let t1 = clock.nanos();
        std::thread::sleep(Duration::from_millis(2));
        let t2 = clock.nanos();

        assert!(t2.wrapping_sub(t1) > 0);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(1_000);

        assert_eq!(clock.advance(Duration::from_micros(1)), 2_000);
        assert_eq!(clock.advance_millis(2), 2_002_000);
        assert_eq!(clock.nanos(), 2_002_000);

        clock.set(-5);
        assert_eq!(clock.nanos(), -5);
    }

    #[test]
    fn test_manual_clock_huge_duration_wraps_modulo_2_64() {
        let clock = ManualClock::new(5);
        // u64::MAX ns is -1 modulo 2^64
        assert_eq!(clock.advance(Duration::from_nanos(u64::MAX)), 4);
    }

    #[test]
    fn test_manual_clock_wraps_past_max() {
        let clock = ManualClock::near_overflow(10);
        assert_eq!(clock.nanos(), i64::MAX - 10);

        let after = clock.advance_millis(1);
        assert!(after < 0);
        // Still exactly 1ms later by signed difference
        assert_eq!(after.wrapping_sub(i64::MAX - 10), NANOS_PER_MILLI);
    }
}
