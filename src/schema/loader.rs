//! Schema loader for record schemas kept on disk
//!
//! - Schemas stored at `<root>/schemas/*.json`, one file per schema version
//! - Malformed files abort loading
//! - A `(schema_id, schema_version)` pair may only be registered once

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;
use crate::observability::Event;

/// Reads schema files from disk and keeps them in memory.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by (schema_id, schema_version)
    schemas: HashMap<(String, String), Schema>,
}

impl SchemaLoader {
    /// Creates a loader for `<root>/schemas/`.
    pub fn new(root: &Path) -> Self {
        Self {
            schema_dir: root.join("schemas"),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file from the schema directory.
    ///
    /// A missing directory is not an error: there is simply nothing to load.
    pub fn load_all(&mut self) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }

        // Directory order is platform dependent
        paths.sort();

        for path in &paths {
            self.load_schema_file(path)?;
        }

        info!(
            event = %Event::SchemasLoaded,
            dir = %self.schema_dir.display(),
            count = paths.len(),
            "schemas loaded"
        );

        Ok(paths.len())
    }

    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let schema: Schema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        self.insert(schema)
    }

    /// Registers a schema directly (for programmatic creation).
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema("<in-memory>", e))?;

        self.insert(schema)
    }

    fn insert(&mut self, schema: Schema) -> SchemaResult<()> {
        let key = (schema.schema_id.clone(), schema.schema_version.clone());
        if self.schemas.contains_key(&key) {
            return Err(SchemaError::duplicate_schema(key.0, key.1));
        }

        self.schemas.insert(key, schema);
        Ok(())
    }

    /// Gets a schema by ID and version.
    pub fn get(&self, schema_id: &str, schema_version: &str) -> Option<&Schema> {
        self.schemas
            .get(&(schema_id.to_string(), schema_version.to_string()))
    }

    /// Checks if a schema exists.
    pub fn exists(&self, schema_id: &str, schema_version: &str) -> bool {
        self.get(schema_id, schema_version).is_some()
    }

    /// Returns all loaded schemas.
    pub fn all_schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::SchemaErrorCode;
    use super::super::types::FieldDef;
    use super::*;
    use tempfile::TempDir;

    fn sample_schema() -> Schema {
        let mut fields = HashMap::new();
        fields.insert("_id".into(), FieldDef::required_object_id());
        fields.insert("n".into(), FieldDef::required_string().with_alias("name"));
        Schema::new("users", "v1", fields)
    }

    fn write_schema_file(root: &Path, name: &str, content: &str) {
        let dir = root.join("schemas");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_register_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema()).unwrap();

        let schema = loader.get("users", "v1").unwrap();
        assert_eq!(schema.schema_id, "users");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        loader.register(sample_schema()).unwrap();

        let err = loader.register(sample_schema()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateSchema);
    }

    #[test]
    fn test_load_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let json = serde_json::to_string_pretty(&sample_schema()).unwrap();
        write_schema_file(temp_dir.path(), "users_v1.json", &json);
        write_schema_file(temp_dir.path(), "README.txt", "not a schema");

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 1);
        assert!(loader.exists("users", "v1"));
        assert_eq!(loader.get("users", "v1").unwrap(), &sample_schema());
    }

    #[test]
    fn test_malformed_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_schema_file(temp_dir.path(), "broken.json", "{ not json");

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_file_without_identifier_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_schema_file(
            temp_dir.path(),
            "noid.json",
            r#"{"schema_id": "tags", "schema_version": "v1", "fields": {"label": {"type": "string", "required": true}}}"#,
        );

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert!(loader.load_all().unwrap_err().message().contains("_id"));
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());

        assert_eq!(loader.load_all().unwrap(), 0);
        assert_eq!(loader.schema_count(), 0);
    }
}
