//! Secret-store mount metadata

use std::fmt;

/// Engine type reported by the store for key-value mounts
pub const KV_ENGINE_TYPE: &str = "kv";

/// Type and version of one secret engine mount
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountInfo {
    pub engine_type: String,
    /// Empty when the mount declares no `version` option
    pub engine_version: String,
}

impl MountInfo {
    #[must_use]
    pub fn new(engine_type: impl Into<String>, engine_version: impl Into<String>) -> Self {
        Self {
            engine_type: engine_type.into(),
            engine_version: engine_version.into(),
        }
    }

    /// The KV API version reads against this mount should use.
    ///
    /// Only a `kv` engine declaring version `2` speaks the v2 protocol; every
    /// other engine (including `generic` and unversioned `kv`) is read flat.
    #[must_use]
    pub fn kv_version(&self) -> KvVersion {
        if self.engine_type == KV_ENGINE_TYPE && self.engine_version == "2" {
            KvVersion::V2
        } else {
            KvVersion::V1
        }
    }
}

/// Wire format of a key-value secret read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KvVersion {
    /// Flat payload at `<mount>/<path>`
    V1,
    /// Payload nested under `data.data` at `<mount>/data/<path>`
    #[default]
    V2,
}

impl fmt::Display for KvVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvVersion::V1 => write!(f, "kv1"),
            KvVersion::V2 => write!(f, "kv2"),
        }
    }
}
