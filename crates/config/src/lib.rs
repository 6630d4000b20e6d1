//! Configuration for buildenv
//!
//! - **`loader`**: reads and parses the YAML variables file
//! - **`settings`**: the optional per-user settings file
//! - **`config`**: merges command-line options with settings into one
//!   immutable [`RunConfig`]

pub mod config;
pub mod loader;
pub mod settings;

pub use config::{OutputMode, RunConfig, RuntimeOptions};
pub use loader::load_variables;
pub use settings::Settings;
