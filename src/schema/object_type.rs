//! Object type descriptors converted from record schemas
//!
//! Fields are exposed under their public names: a field stored as `n` with
//! alias `name` appears as `name`. Nested documents become their own named
//! object types, `<Parent><Field>` in PascalCase.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::api_type::{ApiType, ScalarType};
use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDef, FieldType, Schema};

/// API type descriptor for one record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    name: String,
    /// Fields keyed by public name
    fields: BTreeMap<String, ApiType>,
}

impl ObjectType {
    /// Creates an empty object type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds or replaces a field
    pub fn with_field(mut self, name: impl Into<String>, ty: ApiType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&ApiType> {
        self.fields.get(name)
    }

    /// Iterates fields in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ApiType)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts a record schema into its object type plus every nested
    /// object type it references. The root type comes first.
    pub fn from_schema(name: impl Into<String>, schema: &Schema) -> SchemaResult<Vec<ObjectType>> {
        let mut out = Vec::new();
        convert_fields(name.into(), &schema.fields, &mut out)?;
        Ok(out)
    }
}

fn convert_fields(
    name: String,
    fields: &HashMap<String, FieldDef>,
    out: &mut Vec<ObjectType>,
) -> SchemaResult<()> {
    let position = out.len();
    out.push(ObjectType::new(name.clone()));

    // Sorted so nested type order does not depend on hash order
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();

    let mut converted = BTreeMap::new();
    for key in keys {
        let def = &fields[key];
        let public = def.public_name(key);

        let ty = convert_type(&name, public, &def.field_type, out)?;
        let ty = if def.required { ty.non_null() } else { ty };

        if converted.insert(public.to_string(), ty).is_some() {
            return Err(SchemaError::alias_conflict(
                public,
                format!("public name declared twice on type '{}'", name),
            ));
        }
    }

    out[position].fields = converted;
    Ok(())
}

fn convert_type(
    parent: &str,
    field: &str,
    field_type: &FieldType,
    out: &mut Vec<ObjectType>,
) -> SchemaResult<ApiType> {
    match field_type {
        FieldType::Object { fields } => {
            let nested_name = format!("{}{}", parent, pascal_case(field));
            convert_fields(nested_name.clone(), fields, out)?;
            Ok(ApiType::Object(nested_name))
        }
        FieldType::Array { element_type } => {
            Ok(convert_type(parent, field, element_type, out)?.list())
        }
        scalar => ScalarType::from_field_type(scalar)
            .map(ApiType::Scalar)
            .ok_or_else(|| {
                SchemaError::malformed_schema(
                    parent,
                    format!("field '{}' has unsupported type '{}'", field, scalar.type_name()),
                )
            }),
    }
}

fn pascal_case(field: &str) -> String {
    field
        .split(|c: char| c == '_' || c == '-' || c == '.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_schema() -> Schema {
        let mut contacts = HashMap::new();
        contacts.insert("email".into(), FieldDef::optional_string());
        contacts.insert("ph".into(), FieldDef::optional_string().with_alias("phones"));

        let mut fields = HashMap::new();
        fields.insert("_id".into(), FieldDef::required_object_id());
        fields.insert("n".into(), FieldDef::required_string().with_alias("name"));
        fields.insert("contacts".into(), FieldDef::optional_object(contacts));
        fields.insert("skills".into(), FieldDef::optional_array(FieldType::String));
        Schema::new("users", "v1", fields)
    }

    #[test]
    fn test_fields_use_public_names() {
        let types = ObjectType::from_schema("User", &user_schema()).unwrap();
        let user = &types[0];

        assert_eq!(user.name(), "User");
        assert!(user.has_field("name"));
        assert!(!user.has_field("n"));
        assert_eq!(user.field("_id").unwrap().type_name(), "MongoID!");
        assert_eq!(user.field("name").unwrap().type_name(), "String!");
        assert_eq!(user.field("skills").unwrap().type_name(), "[String]");
    }

    #[test]
    fn test_nested_object_becomes_named_type() {
        let types = ObjectType::from_schema("User", &user_schema()).unwrap();
        assert_eq!(types.len(), 2);

        let user = &types[0];
        assert_eq!(user.field("contacts").unwrap().type_name(), "UserContacts");

        let contacts = &types[1];
        assert_eq!(contacts.name(), "UserContacts");
        assert!(contacts.has_field("phones"));
        assert!(contacts.has_field("email"));
    }

    #[test]
    fn test_public_name_collision_rejected() {
        let mut fields = HashMap::new();
        fields.insert("_id".into(), FieldDef::required_int());
        fields.insert("t".into(), FieldDef::required_string().with_alias("title"));
        fields.insert("title".into(), FieldDef::optional_string());
        let schema = Schema::new("posts", "v1", fields);

        let err = ObjectType::from_schema("Post", &schema).unwrap_err();
        assert_eq!(err.field(), Some("title"));
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("contacts"), "Contacts");
        assert_eq!(pascal_case("home_address"), "HomeAddress");
    }
}
