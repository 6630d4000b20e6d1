//! Optional settings file with per-user defaults
//!
//! ```yaml
//! variables_file: ci/variables.yml
//! environment: dev
//! comments: true
//! ```

use buildenv_core::{Error, Result, SETTINGS_FILENAME};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub variables_file: Option<PathBuf>,
    pub environment: Option<String>,
    pub datacenter: Option<String>,
    pub comments: Option<bool>,
    pub skip_vault: Option<bool>,
    pub mlock: Option<bool>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|e| Error::parse(path, e))
    }

    /// Load `explicit` if given, otherwise `~/.buildenv.yaml` when it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading settings");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(SETTINGS_FILENAME))
    }
}
