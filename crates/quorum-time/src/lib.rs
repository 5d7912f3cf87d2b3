//! Quorum Time - Overflow-safe monotonic timestamps
//!
//! This crate provides:
//! - `Timestamp`: an immutable, `Copy` point on the monotonic clock
//! - Signed-difference ordering that survives tick counter wraparound
//! - `MonotonicClock`: the tick source seam, with system and manual clocks
//!
//! Timestamps carry no locks. They are plain values and are safe to share
//! between threads as-is.

pub mod clock;
pub mod timestamp;

pub use clock::*;
pub use timestamp::*;
