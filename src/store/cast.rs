//! Identifier casting
//!
//! The store, not the operation layer, decides whether a supplied
//! identifier has the right shape. Casting happens when a query executes.

use serde_json::{Number, Value};

use super::errors::{StoreError, StoreResult};
use super::object_id::ObjectId;
use crate::schema::{FieldType, ID_FIELD};

/// Casts `value` to the identifier type declared by the record schema.
///
/// - `object_id`: 24-character hex strings only, normalized to lowercase
/// - `int`: integers and integer strings
/// - `float`: numbers and numeric strings
/// - `string`: strings and numbers (numbers become their decimal form)
/// - `bool`: booleans and `"true"` / `"false"`
///
/// Composite identifier types are never castable.
pub fn cast_identifier(id_type: &FieldType, value: &Value) -> StoreResult<Value> {
    let fail = |kind: &str| StoreError::cast(kind, value, ID_FIELD);

    match id_type {
        FieldType::ObjectId => match value {
            Value::String(s) => Ok(ObjectId::parse_str(s).map_err(|_| fail("ObjectId"))?.into()),
            _ => Err(fail("ObjectId")),
        },
        FieldType::Int => match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0)
                        .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map(Value::from)
                .ok_or_else(|| fail("Number")),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| fail("Number")),
            _ => Err(fail("Number")),
        },
        FieldType::Float => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| fail("Number")),
            _ => Err(fail("Number")),
        },
        FieldType::String => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(fail("String")),
        },
        FieldType::Bool => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(fail("Boolean")),
        },
        FieldType::Object { .. } | FieldType::Array { .. } => Err(fail(id_type.type_name())),
    }
}
