//! Splitting logical secret paths into mount point and sub-path

use crate::topology::Topology;
use buildenv_core::{Error, Result};

/// Where a logical path lives in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretLocation {
    /// Always ends in `/`, like the keys of a mount table
    pub mount_point: String,
    pub sub_path: String,
}

/// Split `path` using the known mounts, or on its first `/` when the
/// topology is undetectable.
///
/// With a detected topology the longest matching mount point wins.
pub fn split(path: &str, topology: &Topology) -> Result<SecretLocation> {
    match topology {
        Topology::Detected(mounts) => mounts
            .keys()
            .filter(|mount_point| path.starts_with(mount_point.as_str()))
            .max_by_key(|mount_point| mount_point.len())
            .map(|mount_point| SecretLocation {
                mount_point: mount_point.clone(),
                sub_path: path[mount_point.len()..].to_string(),
            })
            .ok_or_else(|| Error::no_mount_found(path)),
        Topology::Undetectable => match path.split_once('/') {
            Some((mount, rest)) if !mount.is_empty() => Ok(SecretLocation {
                mount_point: format!("{mount}/"),
                sub_path: rest.to_string(),
            }),
            _ => Err(Error::no_mount_found(path)),
        },
    }
}
