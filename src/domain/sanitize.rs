use serde_json::{Map, Value};

/// Recursively drop entries whose value is null, an empty string, an object
/// that becomes empty after cleaning, or an empty array.
///
/// Arrays with elements pass through untouched: batch endpoints expect
/// literal arrays of objects, so pruning only applies to single-object
/// "optional field" bodies and query maps.
pub fn remove_null_values(body: &Map<String, Value>) -> Map<String, Value> {
    let mut cleaned = Map::new();

    for (key, value) in body {
        match value {
            Value::Null => {}
            Value::String(s) if s.is_empty() => {}
            Value::Object(nested) => {
                let nested = remove_null_values(nested);
                if !nested.is_empty() {
                    cleaned.insert(key.clone(), Value::Object(nested));
                }
            }
            Value::Array(items) if items.is_empty() => {}
            other => {
                cleaned.insert(key.clone(), other.clone());
            }
        }
    }

    cleaned
}
