//! API-facing type descriptors derived from record schemas

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::FieldType;

/// Built-in scalar types of the API layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    /// Opaque store identifier
    #[serde(rename = "MongoID")]
    MongoId,
    String,
    Int,
    Float,
    Boolean,
}

impl ScalarType {
    /// Returns the scalar's API name
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::MongoId => "MongoID",
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Float => "Float",
            ScalarType::Boolean => "Boolean",
        }
    }

    /// Maps a scalar record field type onto its API scalar.
    ///
    /// Returns `None` for composite types.
    pub fn from_field_type(field_type: &FieldType) -> Option<Self> {
        match field_type {
            FieldType::ObjectId => Some(ScalarType::MongoId),
            FieldType::String => Some(ScalarType::String),
            FieldType::Int => Some(ScalarType::Int),
            FieldType::Float => Some(ScalarType::Float),
            FieldType::Bool => Some(ScalarType::Boolean),
            FieldType::Object { .. } | FieldType::Array { .. } => None,
        }
    }
}

/// Type reference as seen by the API layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum ApiType {
    Scalar(ScalarType),
    /// Reference to a named object type
    Object(String),
    List(Box<ApiType>),
    NonNull(Box<ApiType>),
}

impl ApiType {
    /// Wraps the type as non-null. Already non-null types are returned as is.
    pub fn non_null(self) -> Self {
        match self {
            ApiType::NonNull(_) => self,
            other => ApiType::NonNull(Box::new(other)),
        }
    }

    /// Strips a non-null wrapper, if any.
    pub fn nullable(self) -> Self {
        match self {
            ApiType::NonNull(inner) => *inner,
            other => other,
        }
    }

    /// Wraps the type as a list.
    pub fn list(self) -> Self {
        ApiType::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, ApiType::NonNull(_))
    }

    /// Returns the innermost named type (scalar or object name).
    pub fn named_type(&self) -> &str {
        match self {
            ApiType::Scalar(scalar) => scalar.name(),
            ApiType::Object(name) => name,
            ApiType::List(inner) | ApiType::NonNull(inner) => inner.named_type(),
        }
    }

    /// Renders the type reference, e.g. `MongoID!` or `[String]`.
    pub fn type_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiType::Scalar(scalar) => write!(f, "{}", scalar.name()),
            ApiType::Object(name) => write!(f, "{}", name),
            ApiType::List(inner) => write!(f, "[{}]", inner),
            ApiType::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}
