//! # Store Errors

use serde_json::Value;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Value could not be cast to the field's declared type
    #[error("Cast to {kind} failed for value {value} at path \"{path}\"")]
    Cast {
        kind: String,
        value: String,
        path: String,
    },

    #[error("Query exceeded max time of {0}ms")]
    Timeout(u64),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Connectivity or internal backend failure
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a cast error for `value` at `path`
    pub fn cast(kind: impl Into<String>, value: &Value, path: impl Into<String>) -> Self {
        StoreError::Cast {
            kind: kind.into(),
            value: value.to_string(),
            path: path.into(),
        }
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }

    /// Returns true for identifier or value format failures
    pub fn is_cast(&self) -> bool {
        matches!(self, StoreError::Cast { .. })
    }

    /// Get error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Cast { .. } => "STORE_CAST_FAILED",
            StoreError::Timeout(_) => "STORE_TIMEOUT",
            StoreError::DuplicateKey(_) => "STORE_DUPLICATE_KEY",
            StoreError::InvalidDocument(_) => "STORE_INVALID_DOCUMENT",
            StoreError::Backend(_) => "STORE_BACKEND_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cast_error_message() {
        let err = StoreError::cast("ObjectId", &json!(1), "_id");
        assert!(err.is_cast());
        assert_eq!(
            err.to_string(),
            "Cast to ObjectId failed for value 1 at path \"_id\""
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(StoreError::Timeout(50).code(), "STORE_TIMEOUT");
        assert_eq!(StoreError::backend("down").code(), "STORE_BACKEND_FAILED");
        assert!(!StoreError::backend("down").is_cast());
    }
}
