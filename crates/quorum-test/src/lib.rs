//! Quorum Test Harness - Wraparound scenarios and concurrency stress
//!
//! This crate provides:
//! - Heartbeat / election timeout simulation on a wrapping clock
//! - Multi-threaded weak interning stress runs

pub mod intern_stress;
pub mod time_simulator;

pub use intern_stress::*;
pub use time_simulator::*;
