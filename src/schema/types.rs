//! Record schema definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: 64-bit floating point
//! - object_id: 12-byte store identifier
//! - object: Nested document with its own field schema
//! - array: Homogeneous array with element type
//!
//! Fields are keyed by their storage key. A field may declare an `alias`,
//! the public name under which it is exposed to the API layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the identifier field every record schema must declare.
pub const ID_FIELD: &str = "_id";

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// 64-bit floating point
    Float,
    /// Store-generated 12-byte identifier
    ObjectId,
    /// Nested document with its own field schema
    Object {
        /// Nested field definitions
        fields: HashMap<String, FieldDef>,
    },
    /// Homogeneous array with single element type
    Array {
        /// Element type (boxed to allow recursive types)
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
            FieldType::ObjectId => "object_id",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
        }
    }

    /// Returns the nested fields of an object type, looking through arrays.
    pub fn nested_fields(&self) -> Option<&HashMap<String, FieldDef>> {
        match self {
            FieldType::Object { fields } => Some(fields),
            FieldType::Array { element_type } => element_type.nested_fields(),
            _ => None,
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present
    pub required: bool,
    /// Public name exposed instead of the storage key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl FieldDef {
    fn new(field_type: FieldType, required: bool) -> Self {
        Self {
            field_type,
            required,
            alias: None,
        }
    }

    /// Create a required string field
    pub fn required_string() -> Self {
        Self::new(FieldType::String, true)
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self::new(FieldType::String, false)
    }

    /// Create a required int field
    pub fn required_int() -> Self {
        Self::new(FieldType::Int, true)
    }

    /// Create an optional int field
    pub fn optional_int() -> Self {
        Self::new(FieldType::Int, false)
    }

    /// Create a required bool field
    pub fn required_bool() -> Self {
        Self::new(FieldType::Bool, true)
    }

    /// Create a required float field
    pub fn required_float() -> Self {
        Self::new(FieldType::Float, true)
    }

    /// Create a required object id field
    pub fn required_object_id() -> Self {
        Self::new(FieldType::ObjectId, true)
    }

    /// Create an optional object id field
    pub fn optional_object_id() -> Self {
        Self::new(FieldType::ObjectId, false)
    }

    /// Create a required object field
    pub fn required_object(fields: HashMap<String, FieldDef>) -> Self {
        Self::new(FieldType::Object { fields }, true)
    }

    /// Create an optional object field
    pub fn optional_object(fields: HashMap<String, FieldDef>) -> Self {
        Self::new(FieldType::Object { fields }, false)
    }

    /// Create a required array field
    pub fn required_array(element_type: FieldType) -> Self {
        Self::new(
            FieldType::Array {
                element_type: Box::new(element_type),
            },
            true,
        )
    }

    /// Create an optional array field
    pub fn optional_array(element_type: FieldType) -> Self {
        Self::new(
            FieldType::Array {
                element_type: Box::new(element_type),
            },
            false,
        )
    }

    /// Expose this field under a different public name
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Public name of a field stored under `key`
    pub fn public_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.alias.as_deref().unwrap_or(key)
    }
}

/// Complete record schema definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema identifier
    pub schema_id: String,
    /// Schema version
    pub schema_version: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions keyed by storage key
    pub fields: HashMap<String, FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        fields: HashMap<String, FieldDef>,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            description: None,
            fields,
        }
    }

    /// Returns the unique key for this schema (id, version)
    pub fn key(&self) -> (&str, &str) {
        (&self.schema_id, &self.schema_version)
    }

    /// Returns the identifier field definition, if declared
    pub fn id_field(&self) -> Option<&FieldDef> {
        self.fields.get(ID_FIELD)
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> Result<(), String> {
        let id_field = self
            .id_field()
            .ok_or_else(|| format!("Schema must define an '{}' field", ID_FIELD))?;

        if !id_field.required {
            return Err(format!("'{}' field must be required", ID_FIELD));
        }

        if id_field.alias.is_some() {
            return Err(format!("'{}' field cannot be aliased", ID_FIELD));
        }

        Ok(())
    }
}
