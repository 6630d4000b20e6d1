use buildenv_core::{Error, Result, Variables};
use std::path::Path;

/// Read and parse a variables file. An empty file is an empty document.
pub fn load_variables(path: &Path) -> Result<Variables> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e))?;

    if contents.trim().is_empty() {
        tracing::debug!(path = %path.display(), "Variables file is empty");
        return Ok(Variables::default());
    }

    let variables: Variables =
        serde_yaml::from_str(&contents).map_err(|e| Error::parse(path, e))?;

    tracing::debug!(
        path = %path.display(),
        environments = variables.environments.len(),
        "Loaded variables file"
    );
    Ok(variables)
}
