//! Schema error types
//!
//! Error codes:
//! - DOCQL_IDENTIFIER_MISSING (FATAL)
//! - DOCQL_ALIAS_CONFLICT (FATAL)
//! - DOCQL_UNKNOWN_TYPE (REJECT)
//! - DOCQL_DUPLICATE_SCHEMA (REJECT)
//! - DOCQL_MALFORMED_SCHEMA (FATAL)
//!
//! Schema errors surface while operations are being assembled, before any
//! request is served.

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, the registry stays usable
    Reject,
    /// Schema assembly cannot continue
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Type has no identifier field to derive an argument from
    IdentifierMissing,
    /// Two fields map onto the same public or storage name
    AliasConflict,
    /// Type name not registered
    UnknownType,
    /// Schema (id, version) already registered
    DuplicateSchema,
    /// Schema file or structure is malformed
    MalformedSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::IdentifierMissing => "DOCQL_IDENTIFIER_MISSING",
            SchemaErrorCode::AliasConflict => "DOCQL_ALIAS_CONFLICT",
            SchemaErrorCode::UnknownType => "DOCQL_UNKNOWN_TYPE",
            SchemaErrorCode::DuplicateSchema => "DOCQL_DUPLICATE_SCHEMA",
            SchemaErrorCode::MalformedSchema => "DOCQL_MALFORMED_SCHEMA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::UnknownType | SchemaErrorCode::DuplicateSchema => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Type or schema name if applicable
    type_name: Option<String>,
    /// Offending field if applicable
    field: Option<String>,
}

impl SchemaError {
    /// Create an identifier missing error
    pub fn identifier_missing(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let field = field.into();
        Self {
            code: SchemaErrorCode::IdentifierMissing,
            message: format!("Type '{}' has no identifier field '{}'", type_name, field),
            type_name: Some(type_name),
            field: Some(field),
        }
    }

    /// Create an alias conflict error
    pub fn alias_conflict(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AliasConflict,
            message: format!("Alias conflict on '{}': {}", field, reason.into()),
            type_name: None,
            field: Some(field),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            code: SchemaErrorCode::UnknownType,
            message: format!("Type '{}' not registered", type_name),
            type_name: Some(type_name),
            field: None,
        }
    }

    /// Create a duplicate schema error
    pub fn duplicate_schema(schema_id: impl Into<String>, version: impl Into<String>) -> Self {
        let schema_id = schema_id.into();
        Self {
            code: SchemaErrorCode::DuplicateSchema,
            message: format!(
                "Schema '{}' version '{}' already registered",
                schema_id,
                version.into()
            ),
            type_name: Some(schema_id),
            field: None,
        }
    }

    /// Create an error for a malformed schema file or structure
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedSchema,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            type_name: None,
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the type name if applicable
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns the offending field if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::IdentifierMissing.code(), "DOCQL_IDENTIFIER_MISSING");
        assert_eq!(SchemaErrorCode::AliasConflict.code(), "DOCQL_ALIAS_CONFLICT");
        assert_eq!(SchemaErrorCode::UnknownType.code(), "DOCQL_UNKNOWN_TYPE");
        assert_eq!(SchemaErrorCode::DuplicateSchema.code(), "DOCQL_DUPLICATE_SCHEMA");
        assert_eq!(SchemaErrorCode::MalformedSchema.code(), "DOCQL_MALFORMED_SCHEMA");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::IdentifierMissing.severity(), Severity::Fatal);
        assert_eq!(SchemaErrorCode::UnknownType.severity(), Severity::Reject);
    }

    #[test]
    fn test_identifier_missing_context() {
        let err = SchemaError::identifier_missing("User", "_id");
        assert!(err.is_fatal());
        assert_eq!(err.type_name(), Some("User"));
        assert_eq!(err.field(), Some("_id"));

        let display = format!("{}", err);
        assert!(display.contains("FATAL"));
        assert!(display.contains("DOCQL_IDENTIFIER_MISSING"));
    }
}
