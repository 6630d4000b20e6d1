//! HTTP implementation of [`SecretStore`] against the Vault API

use crate::config::VaultConfig;
use crate::error::VaultError;
use crate::store::{MountTable, SecretData, SecretStore};
use async_trait::async_trait;
use buildenv_core::{KvVersion, MountInfo};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

const MOUNTS_PATH: &str = "v1/sys/mounts";

/// Vault client speaking both KV v1 and KV v2
#[derive(Debug, Clone)]
pub struct VaultClient {
    config: VaultConfig,
    base: Url,
    client: Client,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

impl VaultClient {
    pub fn new(config: VaultConfig) -> Result<Self, VaultError> {
        let mut address = config.address.clone();
        if !address.ends_with('/') {
            address.push('/');
        }
        let base = Url::parse(&address)
            .map_err(|e| VaultError::Config(format!("invalid address '{}': {e}", config.address)))?;

        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(path) = &config.ca_cert {
            let bundle = std::fs::read(path).map_err(|e| {
                VaultError::Config(format!("failed to read CA bundle {}: {e}", path.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&bundle)
                .or_else(|_| reqwest::Certificate::from_der(&bundle))
                .map_err(|e| VaultError::Config(format!("failed to parse CA bundle: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        if config.skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| VaultError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            base,
            client,
        })
    }

    pub fn from_env() -> Result<Self, VaultError> {
        Self::new(VaultConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// GET an API path and decode the JSON body
    async fn get(&self, api_path: &str) -> Result<Value, VaultError> {
        let url = self
            .base
            .join(api_path)
            .map_err(|e| VaultError::Config(format!("invalid path '{api_path}': {e}")))?;

        tracing::debug!(url = %url, "Vault request");

        let mut request = self.client.get(url);
        if let Some(token) = &self.config.token {
            request = request.header("X-Vault-Token", token);
        }
        if let Some(namespace) = &self.config.namespace {
            request = request.header("X-Vault-Namespace", namespace);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                VaultError::Config(e.to_string())
            } else {
                VaultError::Unreachable {
                    address: self.config.address.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(VaultError::NotFound {
                path: api_path.to_string(),
            });
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            let message = if body.errors.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            } else {
                body.errors.join(", ")
            };
            return Err(VaultError::Status {
                path: api_path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await.map_err(|e| VaultError::Decode {
            path: api_path.to_string(),
            message: e.to_string(),
        })
    }
}

/// `v1/{mount}/data/{path}` for v2, `v1/{mount}/{path}` for v1
fn secret_api_path(mount: &str, path: &str, version: KvVersion) -> String {
    let mount = mount.trim_matches('/');
    let path = path.trim_start_matches('/');
    match version {
        KvVersion::V2 => format!("v1/{mount}/data/{path}"),
        KvVersion::V1 => format!("v1/{mount}/{path}"),
    }
}

/// Older servers return the table at the top level, newer ones under `data`
fn parse_mounts(body: &Value) -> MountTable {
    let table = match body.get("data") {
        Some(Value::Object(data)) => data,
        _ => match body.as_object() {
            Some(top) => top,
            None => return MountTable::new(),
        },
    };

    table
        .iter()
        .filter(|(mount, _)| mount.ends_with('/'))
        .filter_map(|(mount, details)| {
            let engine_type = details.get("type")?.as_str()?;
            let version = details
                .get("options")
                .and_then(|options| options.get("version"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            Some((mount.clone(), MountInfo::new(engine_type, version)))
        })
        .collect()
}

fn take_object(value: Option<&Value>, path: &str, what: &str) -> Result<SecretData, VaultError> {
    match value {
        Some(Value::Object(map)) => Ok(map.clone()),
        // v2 reports a deleted or destroyed version with null data
        Some(Value::Null) => Err(VaultError::NotFound {
            path: path.to_string(),
        }),
        _ => Err(VaultError::Decode {
            path: path.to_string(),
            message: format!("missing {what} object"),
        }),
    }
}

#[async_trait]
impl SecretStore for VaultClient {
    fn address(&self) -> &str {
        &self.config.address
    }

    async fn list_mounts(&self) -> Result<MountTable, VaultError> {
        let body = self.get(MOUNTS_PATH).await?;
        let mounts = parse_mounts(&body);
        tracing::debug!(count = mounts.len(), "Listed secret engine mounts");
        Ok(mounts)
    }

    async fn read(
        &self,
        mount: &str,
        path: &str,
        version: KvVersion,
    ) -> Result<SecretData, VaultError> {
        let api_path = secret_api_path(mount, path, version);
        let body = self.get(&api_path).await?;
        match version {
            KvVersion::V2 => take_object(
                body.get("data").and_then(|data| data.get("data")),
                &api_path,
                "data.data",
            ),
            KvVersion::V1 => take_object(body.get("data"), &api_path, "data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_secret_api_path() {
        assert_eq!(
            secret_api_path("kv2/", "db/creds", KvVersion::V2),
            "v1/kv2/data/db/creds"
        );
        assert_eq!(
            secret_api_path("/legacy", "/app", KvVersion::V1),
            "v1/legacy/app"
        );
    }

    #[test]
    fn test_parse_mounts_under_data() {
        let body = json!({
            "request_id": "abc",
            "data": {
                "kv2/": { "type": "kv", "options": { "version": "2" } },
                "kv1/": { "type": "kv", "options": null },
                "sys/": { "type": "system" }
            }
        });

        let mounts = parse_mounts(&body);
        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts["kv2/"].kv_version(), KvVersion::V2);
        assert_eq!(mounts["kv1/"].kv_version(), KvVersion::V1);
        assert_eq!(mounts["sys/"].engine_type, "system");
    }

    #[test]
    fn test_parse_mounts_top_level() {
        let body = json!({
            "secret/": { "type": "kv", "options": { "version": "1" } },
            "lease_duration": 0
        });

        let mounts = parse_mounts(&body);
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts["secret/"].engine_version, "1");
    }

    #[test]
    fn test_invalid_address() {
        let err = VaultClient::new(VaultConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, VaultError::Config(_)));
    }
}
