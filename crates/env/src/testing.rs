//! In-memory [`SecretStore`] for tests

use async_trait::async_trait;
use buildenv_core::{KvVersion, MountInfo};
use buildenv_vault::{MountTable, SecretData, SecretStore, VaultError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One `read` call as seen by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadCall {
    pub mount: String,
    pub path: String,
    pub version: KvVersion,
}

/// Secrets keyed by `mount/path` with the mount's trailing slash trimmed.
///
/// The store does not check the wire version of reads; it records them so
/// tests can assert which one was chosen.
#[derive(Debug, Default)]
pub struct MemoryStore {
    mounts: MountTable,
    secrets: HashMap<String, SecretData>,
    forbid_introspection: bool,
    unreachable: bool,
    list_calls: AtomicUsize,
    reads: Mutex<Vec<ReadCall>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mount(mut self, mount_point: &str, info: MountInfo) -> Self {
        self.mounts.insert(mount_point.to_string(), info);
        self
    }

    #[must_use]
    pub fn secret<I, K, V>(mut self, path: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let data = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.secrets.insert(path.to_string(), data);
        self
    }

    /// `list_mounts` answers with a 403
    #[must_use]
    pub fn forbid_introspection(mut self) -> Self {
        self.forbid_introspection = true;
        self
    }

    /// Every call fails as if the connection was refused
    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> Vec<ReadCall> {
        self.reads.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.reads().len()
    }

    fn refuse(&self) -> VaultError {
        VaultError::Unreachable {
            address: self.address().to_string(),
            message: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    fn address(&self) -> &str {
        "memory://"
    }

    async fn list_mounts(&self) -> Result<MountTable, VaultError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(self.refuse());
        }
        if self.forbid_introspection {
            return Err(VaultError::Status {
                path: "v1/sys/mounts".to_string(),
                status: 403,
                message: "permission denied".to_string(),
            });
        }
        Ok(self.mounts.clone())
    }

    async fn read(
        &self,
        mount: &str,
        path: &str,
        version: KvVersion,
    ) -> Result<SecretData, VaultError> {
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(ReadCall {
                mount: mount.to_string(),
                path: path.to_string(),
                version,
            });
        }
        if self.unreachable {
            return Err(self.refuse());
        }
        let key = format!("{}/{}", mount.trim_end_matches('/'), path);
        self.secrets
            .get(&key)
            .cloned()
            .ok_or(VaultError::NotFound { path: key })
    }
}
