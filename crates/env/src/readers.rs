//! Secret readers
//!
//! Each declaration list in a scope has its own reader. All three share one
//! [`SecretBackend`] so mount discovery happens once per run.

use crate::path::{split, SecretLocation};
use crate::topology::LazyTopology;
use async_trait::async_trait;
use buildenv_core::{Error, KvVersion, Output, OutputList, Result, SecretRef, SimpleSecretRef};
use buildenv_vault::{SecretData, SecretStore, VaultError};
use serde_json::Value;

/// Turns one declaration into outputs
#[async_trait]
pub trait SecretReader {
    type Declaration: Sync;

    async fn read(&self, declaration: &Self::Declaration) -> Result<OutputList>;
}

/// Store, lazily discovered topology, and version policy shared by readers
pub struct SecretBackend<'a> {
    store: &'a dyn SecretStore,
    topology: &'a LazyTopology,
    undetected_version: KvVersion,
}

impl<'a> SecretBackend<'a> {
    #[must_use]
    pub fn new(
        store: &'a dyn SecretStore,
        topology: &'a LazyTopology,
        undetected_version: KvVersion,
    ) -> Self {
        Self {
            store,
            topology,
            undetected_version,
        }
    }

    /// Read the secret at a logical path. `forced` bypasses version detection.
    async fn fetch(&self, path: &str, forced: Option<KvVersion>) -> Result<SecretData> {
        let topology = self.topology.get(self.store).await?;
        let SecretLocation {
            mount_point,
            sub_path,
        } = split(path, topology)?;
        let version = forced
            .unwrap_or_else(|| topology.kv_version(&mount_point, self.undetected_version));

        tracing::debug!(
            path,
            mount = %mount_point,
            version = %version,
            "Reading secret"
        );

        self.store
            .read(&mount_point, &sub_path, version)
            .await
            .map_err(|e| match e {
                VaultError::NotFound { .. } => Error::secret_not_found(path),
                other => Error::backend(path, other.to_string()),
            })
    }
}

/// Field values as they appear in the environment
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn outputs_for(secret: &SecretRef, data: &SecretData) -> Result<OutputList> {
    secret
        .sorted_fields()
        .into_iter()
        .map(|(output_name, field)| {
            let value = data
                .get(field)
                .ok_or_else(|| Error::field_not_found(&secret.path, field))?;
            Ok(Output::variable(output_name, coerce(value))
                .with_comment(format!("Path: {}, Key: {}", secret.path, field)))
        })
        .collect()
}

/// Reads `kv_secrets`, choosing the v1 or v2 protocol from the mount
pub struct VersionedKvReader<'a> {
    backend: &'a SecretBackend<'a>,
}

impl<'a> VersionedKvReader<'a> {
    #[must_use]
    pub fn new(backend: &'a SecretBackend<'a>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<'a> SecretReader for VersionedKvReader<'a> {
    type Declaration = SecretRef;

    async fn read(&self, secret: &SecretRef) -> Result<OutputList> {
        let data = self.backend.fetch(&secret.path, None).await?;
        outputs_for(secret, &data)
    }
}

/// Reads `kv1_secrets`, always with the flat v1 protocol
pub struct KvV1Reader<'a> {
    backend: &'a SecretBackend<'a>,
}

impl<'a> KvV1Reader<'a> {
    #[must_use]
    pub fn new(backend: &'a SecretBackend<'a>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<'a> SecretReader for KvV1Reader<'a> {
    type Declaration = SecretRef;

    async fn read(&self, secret: &SecretRef) -> Result<OutputList> {
        let data = self.backend.fetch(&secret.path, Some(KvVersion::V1)).await?;
        outputs_for(secret, &data)
    }
}

/// Reads `secrets` entries as the `value` field of a versioned KV secret
pub struct SimpleSecretReader<'a> {
    inner: VersionedKvReader<'a>,
}

impl<'a> SimpleSecretReader<'a> {
    #[must_use]
    pub fn new(backend: &'a SecretBackend<'a>) -> Self {
        Self {
            inner: VersionedKvReader::new(backend),
        }
    }
}

#[async_trait]
impl<'a> SecretReader for SimpleSecretReader<'a> {
    type Declaration = SimpleSecretRef;

    async fn read(&self, simple: &SimpleSecretRef) -> Result<OutputList> {
        self.inner.read(&SecretRef::from(simple)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use buildenv_core::MountInfo;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .mount("kv2/", MountInfo::new("kv", "2"))
            .mount("kv1/", MountInfo::new("kv", ""))
            .secret(
                "kv2/db",
                [
                    ("username", json!("admin")),
                    ("password", json!("hunter2")),
                    ("port", json!(5432)),
                ],
            )
            .secret("kv1/db", [("password", "hunter2")])
            .secret("kv2/token", [("value", "abc123")])
    }

    #[tokio::test]
    async fn test_versioned_reader_sorts_and_comments() {
        let store = store();
        let topology = LazyTopology::new();
        let backend = SecretBackend::new(&store, &topology, KvVersion::V2);
        let secret = SecretRef::new("kv2/db")
            .field("DB_USER", "username")
            .field("DB_PORT", "port")
            .field("DB_PASS", "password");

        let outputs = VersionedKvReader::new(&backend).read(&secret).await.unwrap();

        assert_eq!(
            outputs.into_inner(),
            vec![
                Output::variable("DB_PASS", "hunter2").with_comment("Path: kv2/db, Key: password"),
                Output::variable("DB_PORT", "5432").with_comment("Path: kv2/db, Key: port"),
                Output::variable("DB_USER", "admin").with_comment("Path: kv2/db, Key: username"),
            ]
        );
        assert_eq!(store.reads()[0].version, KvVersion::V2);
        assert_eq!(store.reads()[0].path, "db");
    }

    #[tokio::test]
    async fn test_versioned_reader_uses_detected_v1() {
        let store = store();
        let topology = LazyTopology::new();
        let backend = SecretBackend::new(&store, &topology, KvVersion::V2);
        let secret = SecretRef::new("kv1/db").field("DB_PASS", "password");

        let outputs = VersionedKvReader::new(&backend).read(&secret).await.unwrap();

        assert_eq!(outputs[0].value, "hunter2");
        assert_eq!(store.reads()[0].version, KvVersion::V1);
    }

    #[tokio::test]
    async fn test_v1_reader_forces_v1_on_v2_mount() {
        let store = store();
        let topology = LazyTopology::new();
        let backend = SecretBackend::new(&store, &topology, KvVersion::V2);
        let secret = SecretRef::new("kv2/db").field("DB_USER", "username");

        KvV1Reader::new(&backend).read(&secret).await.unwrap();

        assert_eq!(store.reads()[0].version, KvVersion::V1);
    }

    #[tokio::test]
    async fn test_simple_reader_reads_value_field() {
        let store = store();
        let topology = LazyTopology::new();
        let backend = SecretBackend::new(&store, &topology, KvVersion::V2);
        let simple = SimpleSecretRef {
            output_name: "API_TOKEN".into(),
            path: "kv2/token".into(),
        };

        let outputs = SimpleSecretReader::new(&backend).read(&simple).await.unwrap();

        assert_eq!(
            outputs.into_inner(),
            vec![Output::variable("API_TOKEN", "abc123").with_comment("Path: kv2/token, Key: value")]
        );
    }

    #[tokio::test]
    async fn test_missing_field() {
        let store = store();
        let topology = LazyTopology::new();
        let backend = SecretBackend::new(&store, &topology, KvVersion::V2);
        let secret = SecretRef::new("kv2/db").field("DB_HOST", "host");

        let err = VersionedKvReader::new(&backend).read(&secret).await.unwrap_err();

        assert!(
            matches!(err, Error::FieldNotFound { path, field } if path == "kv2/db" && field == "host")
        );
    }

    #[tokio::test]
    async fn test_missing_secret() {
        let store = store();
        let topology = LazyTopology::new();
        let backend = SecretBackend::new(&store, &topology, KvVersion::V2);
        let secret = SecretRef::new("kv2/nope").field("X", "x");

        let err = VersionedKvReader::new(&backend).read(&secret).await.unwrap_err();

        assert!(matches!(err, Error::SecretNotFound { path } if path == "kv2/nope"));
    }

    #[tokio::test]
    async fn test_undetectable_assumes_configured_version() {
        let store = MemoryStore::new()
            .forbid_introspection()
            .secret("kv/app", [("value", "x")]);
        let simple = SimpleSecretRef {
            output_name: "APP".into(),
            path: "kv/app".into(),
        };

        let topology = LazyTopology::new();
        let backend = SecretBackend::new(&store, &topology, KvVersion::V2);
        SimpleSecretReader::new(&backend).read(&simple).await.unwrap();

        let topology = LazyTopology::new();
        let backend = SecretBackend::new(&store, &topology, KvVersion::V1);
        SimpleSecretReader::new(&backend).read(&simple).await.unwrap();

        let versions: Vec<KvVersion> = store.reads().iter().map(|r| r.version).collect();
        assert_eq!(versions, vec![KvVersion::V2, KvVersion::V1]);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(&json!("plain")), "plain");
        assert_eq!(coerce(&json!(null)), "");
        assert_eq!(coerce(&json!(true)), "true");
        assert_eq!(coerce(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
