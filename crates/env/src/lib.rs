//! Variable resolution for buildenv
//!
//! This crate turns a parsed variables document into an ordered list of
//! outputs, reading secrets from a [`SecretStore`](buildenv_vault::SecretStore)
//! as it goes.

pub mod path;
pub mod reader;
pub mod readers;
pub mod testing;
pub mod topology;

pub use path::{split, SecretLocation};
pub use reader::EnvReader;
pub use readers::{KvV1Reader, SecretBackend, SecretReader, SimpleSecretReader, VersionedKvReader};
pub use topology::{LazyTopology, Topology};
