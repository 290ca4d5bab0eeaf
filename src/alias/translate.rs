//! Alias translation over plain records
//!
//! Both directions build a new record; the input is never modified. Key
//! order is preserved, a renamed key keeps the position of its storage key.

use serde_json::Value;

use super::map::AliasMap;
use crate::Record;

/// Renames storage keys to their public names.
///
/// Keys absent from the map pass through unchanged. Nested documents, and
/// arrays of nested documents, are translated only where the map declares
/// nested aliases. If a record carries both a storage key and its public
/// name, the value stored under the storage key wins.
pub fn translate_aliases(record: &Record, aliases: &AliasMap) -> Record {
    let mut out = Record::with_capacity(record.len());

    for (key, value) in record {
        match aliases.rule(key) {
            Some(rule) => {
                let value = match &rule.nested {
                    Some(nested) => translate_value(value, nested, translate_aliases),
                    None => value.clone(),
                };
                out.insert(rule.public_name.clone(), value);
            }
            None => {
                if aliases.storage_key(key).is_some() && out.contains_key(key) {
                    continue;
                }
                out.insert(key.clone(), value.clone());
            }
        }
    }

    out
}

/// Renames public names back to storage keys, the inverse of
/// [`translate_aliases`]. Storage keys supplied directly are kept.
pub fn untranslate_aliases(record: &Record, aliases: &AliasMap) -> Record {
    let mut out = Record::with_capacity(record.len());

    for (key, value) in record {
        let storage = aliases.storage_key(key).unwrap_or(key);
        let value = match aliases.nested(storage) {
            Some(nested) => translate_value(value, nested, untranslate_aliases),
            None => value.clone(),
        };
        out.insert(storage.to_string(), value);
    }

    out
}

fn translate_value(value: &Value, nested: &AliasMap, apply: fn(&Record, &AliasMap) -> Record) -> Value {
    match value {
        Value::Object(doc) => Value::Object(apply(doc, nested)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| translate_value(item, nested, apply))
                .collect(),
        ),
        other => other.clone(),
    }
}
