//! Quorum Text - Low-level string plumbing
//!
//! This crate provides:
//! - Trimmed comma splitting
//! - Lowercase hex encoding
//! - Permissive boolean parsing
//! - Round-robin successor lookup
//! - A process-wide weak interning cache

pub mod error;
pub mod intern;
pub mod strings;

pub use error::*;
pub use intern::*;
pub use strings::*;
