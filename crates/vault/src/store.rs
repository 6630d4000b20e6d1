use crate::error::VaultError;
use async_trait::async_trait;
use buildenv_core::{KvVersion, MountInfo};
use std::collections::BTreeMap;

/// Fields of one secret, as returned by the store
pub type SecretData = serde_json::Map<String, serde_json::Value>;

/// Mount point (ending in `/`) to engine metadata
pub type MountTable = BTreeMap<String, MountInfo>;

/// The capabilities the resolution engine needs from a secret store
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Human-readable address of the store, used in diagnostics
    fn address(&self) -> &str;

    /// List every mounted secret engine.
    ///
    /// Implementations must return [`VaultError::Unreachable`] only when the
    /// store could not be contacted; a store that answers but refuses or does
    /// not support introspection returns any other variant.
    async fn list_mounts(&self) -> Result<MountTable, VaultError>;

    /// Read one secret at `path` below `mount` using the given KV protocol.
    ///
    /// A missing secret is [`VaultError::NotFound`].
    async fn read(
        &self,
        mount: &str,
        path: &str,
        version: KvVersion,
    ) -> Result<SecretData, VaultError>;
}
