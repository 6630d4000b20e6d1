//! HashiCorp Vault access for buildenv
//!
//! The resolution engine only needs two things from a secret store: the list
//! of mounted secret engines and a way to read one KV secret. The
//! [`SecretStore`] trait captures exactly that, and [`VaultClient`] implements
//! it over Vault's HTTP API.

pub mod client;
pub mod config;
pub mod error;
pub mod store;

pub use client::VaultClient;
pub use config::VaultConfig;
pub use error::VaultError;
pub use store::{MountTable, SecretData, SecretStore};
