//! Type registry
//!
//! Holds the object types assembled from record schemas and derives the API
//! type of a record type's identifier argument.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::api_type::ApiType;
use super::errors::{SchemaError, SchemaResult};
use super::object_type::ObjectType;
use super::types::{Schema, ID_FIELD};

/// Capability the operation builder needs from a type registry.
pub trait TypeRegistry: Send + Sync {
    /// Derives the API type of `type_descriptor`'s identifier argument.
    ///
    /// The result is always non-null. Fails when the type declares no
    /// identifier field.
    fn derive_identifier_type(&self, type_descriptor: &ObjectType) -> SchemaResult<ApiType>;
}

/// In-memory registry of object types, safe to share across threads.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    types: RwLock<HashMap<String, Arc<ObjectType>>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts `schema` into an object type named `name`, registering it
    /// together with its nested types. Returns the root type.
    pub fn register_schema(
        &self,
        name: impl Into<String>,
        schema: &Schema,
    ) -> SchemaResult<Arc<ObjectType>> {
        let name = name.into();
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(&name, e))?;

        let converted = ObjectType::from_schema(&name, schema)?;

        let mut types = self
            .types
            .write()
            .map_err(|_| SchemaError::malformed_schema(&name, "registry lock poisoned"))?;

        let mut root = None;
        for object_type in converted {
            let object_type = Arc::new(object_type);
            if root.is_none() {
                root = Some(Arc::clone(&object_type));
            }
            types.insert(object_type.name().to_string(), object_type);
        }

        root.ok_or_else(|| SchemaError::malformed_schema(name, "conversion produced no type"))
    }

    /// Registers an already built object type, replacing any previous one.
    pub fn register(&self, object_type: ObjectType) -> SchemaResult<Arc<ObjectType>> {
        let object_type = Arc::new(object_type);
        let mut types = self.types.write().map_err(|_| {
            SchemaError::malformed_schema(object_type.name(), "registry lock poisoned")
        })?;
        types.insert(object_type.name().to_string(), Arc::clone(&object_type));
        Ok(object_type)
    }

    /// Gets a registered type by name
    pub fn get(&self, name: &str) -> SchemaResult<Arc<ObjectType>> {
        let types = self
            .types
            .read()
            .map_err(|_| SchemaError::malformed_schema(name, "registry lock poisoned"))?;
        types
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::unknown_type(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types
            .read()
            .map(|types| types.contains_key(name))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.types.read().map(|types| types.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every registered type
    pub fn clear(&self) {
        if let Ok(mut types) = self.types.write() {
            types.clear();
        }
    }
}

impl TypeRegistry for SchemaRegistry {
    fn derive_identifier_type(&self, type_descriptor: &ObjectType) -> SchemaResult<ApiType> {
        type_descriptor
            .field(ID_FIELD)
            .cloned()
            .map(ApiType::non_null)
            .ok_or_else(|| SchemaError::identifier_missing(type_descriptor.name(), ID_FIELD))
    }
}
