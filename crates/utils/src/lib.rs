//! Shared process-level utilities for buildenv
//!
//! Logging initialisation for the binary and memory locking, which keeps
//! secret values out of swap.

pub mod memory;
pub mod tracing;

pub use memory::lock_all;
