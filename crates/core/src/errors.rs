use crate::constants::{
    EXIT_BAD_INPUT, EXIT_CONFIGURATION, EXIT_FILE_UNREADABLE, EXIT_MLOCK, EXIT_NOT_FOUND,
    EXIT_SERIALIZATION, EXIT_STORE,
};
use crate::types::{ScopeKind, SecretCategory};
use std::path::PathBuf;

/// Result type alias for buildenv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for buildenv operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The secret store could not be reached at all
    #[error("secret store at '{address}' is unavailable: {message}")]
    StoreUnavailable { address: String, message: String },

    /// A secret path matched no known or heuristic mount point
    #[error("no mount point found for path '{path}'")]
    NoMountFound { path: String },

    /// The store reported no secret at the path
    #[error("secret does not exist: '{path}'")]
    SecretNotFound { path: String },

    /// The secret exists but lacks a requested field
    #[error("key '{field}' not found in path '{path}'")]
    FieldNotFound { path: String, field: String },

    /// Any other store-reported failure
    #[error("error reading path '{path}': {message}")]
    Backend { path: String, message: String },

    /// A secret read failure, annotated with where the declaration lives
    #[error("{scope} {category} error: {source}")]
    InScope {
        scope: ScopeKind,
        category: SecretCategory,
        #[source]
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML documents that do not match the variable model
    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON serialization errors
    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Unsupported operation errors
    #[error("unsupported feature '{feature}': {message}")]
    Unsupported { feature: String, message: String },

    /// Locking process memory failed
    #[error("mlock error: {message}")]
    Mlock { message: String },
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serialization {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    #[must_use]
    pub fn store_unavailable(address: impl Into<String>, message: impl Into<String>) -> Self {
        Error::StoreUnavailable {
            address: address.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn no_mount_found(path: impl Into<String>) -> Self {
        Error::NoMountFound { path: path.into() }
    }

    #[must_use]
    pub fn secret_not_found(path: impl Into<String>) -> Self {
        Error::SecretNotFound { path: path.into() }
    }

    #[must_use]
    pub fn field_not_found(path: impl Into<String>, field: impl Into<String>) -> Self {
        Error::FieldNotFound {
            path: path.into(),
            field: field.into(),
        }
    }

    #[must_use]
    pub fn backend(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Backend {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Annotate a reader error with the scope and declaration list it came from
    #[must_use]
    pub fn in_scope(self, scope: ScopeKind, category: SecretCategory) -> Self {
        Error::InScope {
            scope,
            category,
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Error::Parse {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn unsupported(feature: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Unsupported {
            feature: feature.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn mlock(message: impl Into<String>) -> Self {
        Error::Mlock {
            message: message.into(),
        }
    }

    /// The underlying error with any scope annotations removed
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::InScope { source, .. } => source.root(),
            other => other,
        }
    }

    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InScope { source, .. } => source.exit_code(),
            Error::Configuration { .. } | Error::Unsupported { .. } => EXIT_CONFIGURATION,
            Error::FileSystem { .. } => EXIT_FILE_UNREADABLE,
            Error::Parse { .. } | Error::NoMountFound { .. } => EXIT_BAD_INPUT,
            Error::StoreUnavailable { .. } | Error::Backend { .. } => EXIT_STORE,
            Error::SecretNotFound { .. } | Error::FieldNotFound { .. } => EXIT_NOT_FOUND,
            Error::Serialization { .. } => EXIT_SERIALIZATION,
            Error::Mlock { .. } => EXIT_MLOCK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_annotation_keeps_root_cause() {
        let err = Error::field_not_found("kv/db", "password").in_scope(
            ScopeKind::Environment("dev".to_string()),
            SecretCategory::KvSecrets,
        );

        assert!(matches!(err.root(), Error::FieldNotFound { field, .. } if field == "password"));
        assert_eq!(
            err.to_string(),
            "environment 'dev' kv secret error: key 'password' not found in path 'kv/db'"
        );
    }

    #[test]
    fn test_exit_codes_are_distinct_per_failure_class() {
        let bad_input = Error::no_mount_found("nomount");
        let unreachable = Error::store_unavailable("http://127.0.0.1:8200", "connection refused");
        let not_found = Error::secret_not_found("kv/missing");
        let missing_field = Error::field_not_found("kv/db", "user");
        let serialization = Error::from(serde_json::from_str::<u8>("x").unwrap_err());

        assert_eq!(bad_input.exit_code(), EXIT_BAD_INPUT);
        assert_eq!(unreachable.exit_code(), EXIT_STORE);
        assert_eq!(not_found.exit_code(), EXIT_NOT_FOUND);
        assert_eq!(missing_field.exit_code(), EXIT_NOT_FOUND);
        assert_eq!(serialization.exit_code(), EXIT_SERIALIZATION);
    }

    #[test]
    fn test_exit_code_looks_through_scope() {
        let err = Error::backend("kv/db", "permission denied")
            .in_scope(ScopeKind::Global, SecretCategory::Kv1Secrets);
        assert_eq!(err.exit_code(), EXIT_STORE);
    }
}
