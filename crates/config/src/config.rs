//! The immutable configuration of one buildenv run

use crate::settings::Settings;
use buildenv_core::{Error, Result, DEFAULT_VARIABLES_FILE};
use std::path::PathBuf;

/// What happens to the resolved outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// `export` statements on stdout
    Export,
    /// One base64 JSON token on stdout
    Base64Json,
    /// Run this shell command with the variables set
    Exec(String),
}

/// Options given on the command line; `None` and `false` defer to settings
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    pub variables_file: Option<PathBuf>,
    pub environment: Option<String>,
    pub datacenter: Option<String>,
    pub comments: bool,
    pub skip_vault: bool,
    pub mlock: bool,
    pub base64_json: bool,
    pub run: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub variables_file: PathBuf,
    /// Empty when no environment was selected
    pub environment: String,
    /// Empty when no datacenter was selected
    pub datacenter: String,
    pub comments: bool,
    pub skip_vault: bool,
    pub mlock: bool,
    pub output: OutputMode,
}

impl RunConfig {
    /// Merge command-line options over settings.
    ///
    /// Fails when a datacenter is selected without an environment.
    pub fn resolve(options: RuntimeOptions, settings: Settings) -> Result<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        let environment = non_empty(options.environment)
            .or_else(|| non_empty(settings.environment))
            .unwrap_or_default();
        let datacenter = non_empty(options.datacenter)
            .or_else(|| non_empty(settings.datacenter))
            .unwrap_or_default();

        if environment.is_empty() && !datacenter.is_empty() {
            return Err(Error::configuration(format!(
                "datacenter '{datacenter}' requires an environment"
            )));
        }

        let output = match options.run {
            Some(command) => OutputMode::Exec(command),
            None if options.base64_json => OutputMode::Base64Json,
            None => OutputMode::Export,
        };

        Ok(Self {
            variables_file: options
                .variables_file
                .or(settings.variables_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VARIABLES_FILE)),
            environment,
            datacenter,
            comments: options.comments || settings.comments.unwrap_or(false),
            skip_vault: options.skip_vault || settings.skip_vault.unwrap_or(false),
            mlock: options.mlock || settings.mlock.unwrap_or(false),
            output,
        })
    }
}
