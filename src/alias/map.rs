//! Alias maps: storage key to public field name, per record type
//!
//! A map is plain data, built once from the record schema and shared
//! read-only by every request against that record type.

use std::collections::HashMap;

use crate::schema::{FieldDef, Schema, SchemaError, SchemaResult};

/// Rule for one storage key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRule {
    /// Name the field is exposed under. Equal to the storage key when only
    /// nested fields are aliased.
    pub public_name: String,
    /// Aliases declared inside a nested document (or array of documents)
    pub nested: Option<AliasMap>,
}

/// Storage key to public name mapping
///
/// No public name may coincide with another rule's storage key, so applying
/// a translation twice renames nothing the second time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    rules: HashMap<String, AliasRule>,
    storage_by_public: HashMap<String, String>,
}

impl AliasMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the alias map declared by a record schema.
    pub fn from_schema(schema: &Schema) -> SchemaResult<Self> {
        Self::from_fields(&schema.fields)
    }

    fn from_fields(fields: &HashMap<String, FieldDef>) -> SchemaResult<Self> {
        let mut map = Self::new();

        let mut keys: Vec<&String> = fields.keys().collect();
        keys.sort();

        for key in keys {
            let def = &fields[key];
            let public = def.public_name(key);

            if public != key && fields.contains_key(public) {
                return Err(SchemaError::alias_conflict(
                    public,
                    format!("alias of '{}' shadows a declared field", key),
                ));
            }

            let nested = match def.field_type.nested_fields() {
                Some(nested_fields) => Some(Self::from_fields(nested_fields)?),
                None => None,
            }
            .filter(|nested| !nested.is_empty());

            if public != key || nested.is_some() {
                map.insert_rule(key, public, nested)?;
            }
        }

        Ok(map)
    }

    /// Declares `storage_key` to be exposed as `public_name`.
    pub fn insert(
        &mut self,
        storage_key: impl Into<String>,
        public_name: impl Into<String>,
    ) -> SchemaResult<()> {
        let storage_key = storage_key.into();
        let public_name = public_name.into();
        self.insert_rule(&storage_key, &public_name, None)
    }

    /// Declares aliases for a nested document stored under `storage_key`.
    pub fn insert_nested(
        &mut self,
        storage_key: impl Into<String>,
        public_name: impl Into<String>,
        nested: AliasMap,
    ) -> SchemaResult<()> {
        let storage_key = storage_key.into();
        let public_name = public_name.into();
        let nested = Some(nested).filter(|n| !n.is_empty());
        self.insert_rule(&storage_key, &public_name, nested)
    }

    fn insert_rule(
        &mut self,
        storage_key: &str,
        public_name: &str,
        nested: Option<AliasMap>,
    ) -> SchemaResult<()> {
        if self.rules.contains_key(storage_key) {
            return Err(SchemaError::alias_conflict(storage_key, "storage key declared twice"));
        }
        if let Some(owner) = self.storage_by_public.get(public_name) {
            return Err(SchemaError::alias_conflict(
                public_name,
                format!("public name already used by '{}'", owner),
            ));
        }
        if public_name != storage_key && self.rules.contains_key(public_name) {
            return Err(SchemaError::alias_conflict(
                public_name,
                "public name is another field's storage key",
            ));
        }
        if let Some(owner) = self.storage_by_public.get(storage_key) {
            if owner != storage_key {
                return Err(SchemaError::alias_conflict(
                    storage_key,
                    format!("storage key is the public name of '{}'", owner),
                ));
            }
        }

        self.storage_by_public
            .insert(public_name.to_string(), storage_key.to_string());
        self.rules.insert(
            storage_key.to_string(),
            AliasRule {
                public_name: public_name.to_string(),
                nested,
            },
        );
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Rule declared for a storage key
    pub fn rule(&self, storage_key: &str) -> Option<&AliasRule> {
        self.rules.get(storage_key)
    }

    /// Public name of a storage key, if the key is declared
    pub fn public_name(&self, storage_key: &str) -> Option<&str> {
        self.rules.get(storage_key).map(|r| r.public_name.as_str())
    }

    /// Storage key behind a public name, if the name is declared
    pub fn storage_key(&self, public_name: &str) -> Option<&str> {
        self.storage_by_public.get(public_name).map(String::as_str)
    }

    /// Nested alias map declared under a storage key
    pub fn nested(&self, storage_key: &str) -> Option<&AliasMap> {
        self.rules.get(storage_key).and_then(|r| r.nested.as_ref())
    }

    /// Maps a dotted public path (`contacts.phones`) onto its storage path
    /// (`contacts.ph`). Undeclared segments are kept as written.
    pub fn to_storage_path(&self, public_path: &str) -> String {
        let mut current = Some(self);
        let mut segments = Vec::new();

        for segment in public_path.split('.') {
            let storage = current
                .and_then(|map| map.storage_key(segment))
                .unwrap_or(segment)
                .to_string();
            current = current.and_then(|map| map.nested(&storage));
            segments.push(storage);
        }

        segments.join(".")
    }
}
