//! Core domain types, errors, and constants for `buildenv`.
//!
//! ## Key Components
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias. Every failure a
//!   resolution run can hit is one of these variants, and each maps onto a
//!   process exit code.
//! - **`types`**: the declarative variable model (`Variables`, `Scope`,
//!   `SecretRef`), secret-store mount metadata, and the resolved `OutputList`.
//! - **`constants`**: shared names such as default file paths, environment
//!   variables, and exit codes.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    types::*,
};
