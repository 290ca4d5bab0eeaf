//! Collections: one record type bound to a backend

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::adapter::StoreAdapter;
use super::backend::DocumentStore;
use super::cast::cast_identifier;
use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use super::object_id::ObjectId;
use super::query::LazyQuery;
use crate::alias::{untranslate_aliases, AliasMap};
use crate::observability::Event;
use crate::schema::{FieldType, Schema, SchemaError, SchemaResult, ID_FIELD};
use crate::Record;

/// A record type's backing collection
pub struct Collection {
    model_name: String,
    schema: Schema,
    id_type: FieldType,
    aliases: Arc<AliasMap>,
    store: Arc<dyn DocumentStore>,
    config: StoreConfig,
}

impl Collection {
    /// Binds `schema` to `store` under the model name `model_name`.
    ///
    /// Records live in the collection named after the schema id.
    pub fn new(
        model_name: impl Into<String>,
        schema: Schema,
        store: Arc<dyn DocumentStore>,
    ) -> SchemaResult<Self> {
        let model_name = model_name.into();
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(&model_name, e))?;

        let id_type = schema
            .id_field()
            .map(|def| def.field_type.clone())
            .ok_or_else(|| SchemaError::identifier_missing(&model_name, ID_FIELD))?;
        let aliases = Arc::new(AliasMap::from_schema(&schema)?);

        Ok(Self {
            model_name,
            schema,
            id_type,
            aliases,
            store,
            config: StoreConfig::default(),
        })
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.schema.schema_id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Builds, without running, a hydrating point lookup for `id`.
    pub fn find_by_id(&self, id: Value) -> LazyQuery {
        let mut query = LazyQuery::new(
            Arc::clone(&self.store),
            self.model_name.clone(),
            self.schema.schema_id.clone(),
            self.id_type.clone(),
            id,
            Arc::clone(&self.aliases),
        );
        if let Some(limit) = self.config.max_time() {
            query.set_max_time(limit);
        }
        query
    }

    /// Inserts a document written under public field names.
    ///
    /// Public names are mapped back to storage keys, a missing `_id` is
    /// generated for object id keyed types, and the version key is stamped.
    /// Returns the record as stored.
    pub async fn create(&self, document: Value) -> StoreResult<Record> {
        let public = match document {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::InvalidDocument(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };

        let mut record = untranslate_aliases(&public, &self.aliases);

        let id = match record.get(ID_FIELD) {
            Some(id) => cast_identifier(&self.id_type, id)?,
            None if self.id_type == FieldType::ObjectId => ObjectId::new().into(),
            None => {
                return Err(StoreError::InvalidDocument(format!(
                    "'{}' is required for {}",
                    ID_FIELD, self.model_name
                )))
            }
        };

        // `_id` leads the stored record
        let mut stored = Record::with_capacity(record.len() + 2);
        stored.insert(ID_FIELD.to_string(), id);
        record.remove(ID_FIELD);
        stored.extend(record);

        if let Some(version_key) = &self.config.version_key {
            stored.entry(version_key.clone()).or_insert(Value::from(0));
        }

        self.store.insert(&self.schema.schema_id, stored.clone()).await?;

        debug!(
            event = %Event::DocumentCreated,
            model = %self.model_name,
            id = %stored[ID_FIELD],
            "document stored"
        );

        Ok(stored)
    }
}

impl StoreAdapter for Collection {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn find_by_id_lean(&self, id: Value) -> LazyQuery {
        self.find_by_id(id).lean(true)
    }

    fn aliases(&self) -> &AliasMap {
        &self.aliases
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("model_name", &self.model_name)
            .field("collection", &self.schema.schema_id)
            .field("config", &self.config)
            .finish()
    }
}
