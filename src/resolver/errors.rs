//! # Resolver Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for resolve calls
pub type ResolveResult<T> = Result<T, ResolverError>;

/// Resolve errors
///
/// Store failures pass through untouched; nothing is retried or recovered
/// at this layer.
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Raised by a caller-supplied `before_query` substitute
    #[error("beforeQuery hook failed: {0}")]
    Hook(String),
}

impl ResolverError {
    pub fn hook(msg: impl Into<String>) -> Self {
        ResolverError::Hook(msg.into())
    }

    /// The underlying store error, if any
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            ResolverError::Store(err) => Some(err),
            ResolverError::Hook(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_error_is_transparent() {
        let store_err = StoreError::cast("ObjectId", &json!(1), "_id");
        let err: ResolverError = store_err.clone().into();

        assert_eq!(err.to_string(), store_err.to_string());
        assert!(err.store_error().unwrap().is_cast());
    }

    #[test]
    fn test_hook_error() {
        let err = ResolverError::hook("denied");
        assert!(err.store_error().is_none());
        assert!(err.to_string().contains("denied"));
    }
}
