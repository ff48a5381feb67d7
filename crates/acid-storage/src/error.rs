//! Error types for project storage
//!
//! Layered the same way the lookup is:
//! - [`StoreError`]: raised by a [`SecretStore`](crate::SecretStore)
//! - [`DecodeError`]: raised while turning record data into a project
//! - [`StorageError`]: what [`Storage::get`](crate::Storage::get) returns

use std::path::PathBuf;

/// Errors from a secret store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record with this name in the namespace
    #[error("secret {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    /// Backend could not be reached or refused the request
    #[error("secret store unavailable: {0}")]
    Unavailable(String),

    /// Backend returned something that is not a usable secret record
    #[error("malformed secret at {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl StoreError {
    /// Create not-found error
    pub fn not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create malformed-record error
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors while decoding record data into a project
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The `secrets` field is not a JSON object of strings
    #[error("invalid secrets JSON: {0}")]
    Secrets(#[source] serde_json::Error),
}

/// Errors returned by a project lookup
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Store could not serve the read
    #[error("connectivity error: {0}")]
    Connectivity(#[source] StoreError),

    /// No project record under the derived key
    #[error("project {key} not found in namespace {namespace}")]
    NotFound { namespace: String, key: String },

    /// Record was found but could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl StorageError {
    /// Check if the project record does not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if a caller-side retry could succeed
    ///
    /// Only transport failures qualify; a missing or malformed record stays
    /// that way until someone rewrites it.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity(StoreError::Unavailable(_)))
    }
}

impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { namespace, name } => Self::NotFound {
                namespace,
                key: name,
            },
            other => Self::Connectivity(other),
        }
    }
}

/// Result type alias for project lookups
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::not_found("default", "acid-abc");
        assert_eq!(err.to_string(), "secret default/acid-abc not found");
    }

    #[test]
    fn not_found_converts_to_not_found() {
        let err: StorageError = StoreError::not_found("ci", "acid-abc").into();
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "project acid-abc not found in namespace ci");
    }

    #[test]
    fn unavailable_converts_to_connectivity() {
        let err: StorageError = StoreError::Unavailable("connection refused".into()).into();
        assert!(matches!(err, StorageError::Connectivity(_)));
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("connectivity error"));
    }

    #[test]
    fn malformed_is_not_retryable() {
        let err: StorageError = StoreError::malformed("default/x.yaml", "bad kind").into();
        assert!(matches!(err, StorageError::Connectivity(StoreError::Malformed { .. })));
        assert!(!err.is_retryable());
    }

    #[test]
    fn decode_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let err: StorageError = DecodeError::Secrets(json_err).into();
        assert!(matches!(err, StorageError::Decode(_)));
        assert!(err.to_string().contains("invalid secrets JSON"));
    }
}
