//! Client configuration, read from the standard `VAULT_*` environment variables

use crate::error::VaultError;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const TOKEN_FILE: &str = ".vault-token";

pub const ADDRESS_VAR: &str = "VAULT_ADDR";
pub const TOKEN_VAR: &str = "VAULT_TOKEN";
pub const NAMESPACE_VAR: &str = "VAULT_NAMESPACE";
pub const CA_CERT_VAR: &str = "VAULT_CACERT";
pub const SKIP_VERIFY_VAR: &str = "VAULT_SKIP_VERIFY";
pub const TIMEOUT_VAR: &str = "VAULT_CLIENT_TIMEOUT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub address: String,
    pub token: Option<String>,
    pub namespace: Option<String>,
    /// PEM or DER bundle added to the trusted roots
    pub ca_cert: Option<PathBuf>,
    pub skip_verify: bool,
    pub timeout: Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            token: None,
            namespace: None,
            ca_cert: None,
            skip_verify: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl VaultConfig {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the process environment, falling back to `~/.vault-token` for the token
    pub fn from_env() -> Result<Self, VaultError> {
        Self::from_lookup(|name| std::env::var(name).ok(), dirs::home_dir().as_deref())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F, home: Option<&Path>) -> Result<Self, VaultError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let address = get(ADDRESS_VAR).unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let token = match get(TOKEN_VAR) {
            Some(token) => Some(token),
            None => home.and_then(read_token_file),
        };

        let timeout = match get(TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        let skip_verify = get(SKIP_VERIFY_VAR)
            .map(|value| matches!(value.as_str(), "1" | "t" | "true" | "TRUE" | "True"))
            .unwrap_or(false);

        Ok(Self {
            address,
            token,
            namespace: get(NAMESPACE_VAR),
            ca_cert: get(CA_CERT_VAR).map(PathBuf::from),
            skip_verify,
            timeout,
        })
    }
}

fn read_token_file(home: &Path) -> Option<String> {
    let path = home.join(TOKEN_FILE);
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() {
                None
            } else {
                tracing::debug!(path = %path.display(), "Using token from file");
                Some(token.to_string())
            }
        }
        Err(_) => None,
    }
}

/// Accepts plain seconds (`30`) or a seconds suffix (`30s`)
fn parse_timeout(raw: &str) -> Result<Duration, VaultError> {
    raw.trim()
        .trim_end_matches('s')
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| VaultError::Config(format!("invalid {TIMEOUT_VAR} value '{raw}'")))
}
