use thiserror::Error;

/// Errors returned by a [`SecretStore`](crate::SecretStore)
#[derive(Error, Debug)]
pub enum VaultError {
    /// No connection could be made to the store
    #[error("failed to connect to {address}: {message}")]
    Unreachable { address: String, message: String },

    /// The store answered 404
    #[error("nothing found at {path}")]
    NotFound { path: String },

    /// Any other non-success HTTP status
    #[error("{status} from {path}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    /// A success response whose body did not have the expected shape
    #[error("invalid response from {path}: {message}")]
    Decode { path: String, message: String },

    /// The client itself could not be configured
    #[error("vault client configuration error: {0}")]
    Config(String),
}

impl VaultError {
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, VaultError::Unreachable { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound { .. })
    }
}
