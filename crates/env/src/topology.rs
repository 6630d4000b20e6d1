//! Secret-store mount topology
//!
//! Discovered at most once per run, on the first secret read. A store that
//! refuses introspection still works: the topology is then marked
//! undetectable and paths are split on their first segment.

use buildenv_core::{Error, KvVersion, MountInfo, Result};
use buildenv_vault::{MountTable, SecretStore};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Introspection succeeded; every mount the store reported
    Detected(MountTable),
    /// Introspection was refused or unsupported
    Undetectable,
}

impl Topology {
    /// Ask the store for its mount table.
    ///
    /// Only an unreachable store fails; any other introspection error
    /// degrades to [`Topology::Undetectable`].
    pub async fn discover(store: &dyn SecretStore) -> Result<Self> {
        match store.list_mounts().await {
            Ok(mounts) => {
                tracing::debug!(
                    address = store.address(),
                    mounts = mounts.len(),
                    "Detected secret store topology"
                );
                Ok(Topology::Detected(mounts))
            }
            Err(e) if e.is_unreachable() => {
                Err(Error::store_unavailable(store.address(), e.to_string()))
            }
            Err(e) => {
                tracing::warn!(
                    address = store.address(),
                    error = %e,
                    "Mount introspection unavailable, assuming one-segment mount points"
                );
                Ok(Topology::Undetectable)
            }
        }
    }

    #[must_use]
    pub fn is_detectable(&self) -> bool {
        matches!(self, Topology::Detected(_))
    }

    #[must_use]
    pub fn mount(&self, mount_point: &str) -> Option<&MountInfo> {
        match self {
            Topology::Detected(mounts) => mounts.get(mount_point),
            Topology::Undetectable => None,
        }
    }

    /// KV protocol for reads below `mount_point`.
    ///
    /// `undetected` is used when the topology is unknown.
    #[must_use]
    pub fn kv_version(&self, mount_point: &str, undetected: KvVersion) -> KvVersion {
        match self {
            Topology::Detected(_) => self
                .mount(mount_point)
                .map(MountInfo::kv_version)
                .unwrap_or(KvVersion::V1),
            Topology::Undetectable => undetected,
        }
    }
}

/// Topology that is discovered on first use and then shared
#[derive(Debug, Default)]
pub struct LazyTopology {
    cell: OnceCell<Topology>,
}

impl LazyTopology {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Already-initialised topology, for callers that know it up front
    #[must_use]
    pub fn ready(topology: Topology) -> Self {
        Self {
            cell: OnceCell::new_with(Some(topology)),
        }
    }

    pub async fn get(&self, store: &dyn SecretStore) -> Result<&Topology> {
        self.cell
            .get_or_try_init(|| Topology::discover(store))
            .await
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
