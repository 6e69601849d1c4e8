//! Mapping between JSON values and Firestore typed values.
//!
//! The Firestore REST API wraps every field in a typed value object
//! (`{"stringValue": ...}`, `{"mapValue": {"fields": ...}}`, ...). This
//! module converts between that representation and plain `serde_json`
//! values so the rest of the crate never sees the wire shape.

use serde_json::{Map, Number, Value, json};

/// Convert a plain JSON object into Firestore document `fields`.
#[must_use]
pub fn fields_to_document(fields: &Map<String, Value>) -> Value {
    let converted: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), to_firestore_value(v)))
        .collect();
    Value::Object(converted)
}

/// Convert Firestore document `fields` back into a plain JSON object.
#[must_use]
pub fn fields_from_document(fields: &Value) -> Value {
    let Some(map) = fields.as_object() else {
        return Value::Object(Map::new());
    };

    let converted: Map<String, Value> = map
        .iter()
        .map(|(k, v)| (k.clone(), from_firestore_value(v)))
        .collect();
    Value::Object(converted)
}

/// Wrap a JSON value in its Firestore typed-value object.
fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({"nullValue": null}),
        Value::Bool(b) => json!({"booleanValue": b}),
        Value::Number(n) => n.as_i64().map_or_else(
            || json!({"doubleValue": n.as_f64()}),
            // Firestore integers travel as decimal strings
            |i| json!({"integerValue": i.to_string()}),
        ),
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_firestore_value).collect();
            json!({"arrayValue": {"values": values}})
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), to_firestore_value(v)))
                .collect();
            json!({"mapValue": {"fields": fields}})
        }
    }
}

/// Unwrap a Firestore typed-value object into plain JSON.
fn from_firestore_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = map.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(raw) = map.get("integerValue") {
        // Arrives as a decimal string; tolerate a bare number too
        let parsed = raw
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| raw.as_i64());
        if let Some(i) = parsed {
            return Value::Number(Number::from(i));
        }
        return Value::Null;
    }
    if let Some(f) = map.get("doubleValue").and_then(Value::as_f64) {
        return Number::from_f64(f).map_or(Value::Null, Value::Number);
    }
    if let Some(b) = map.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if map.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(ts) = map.get("timestampValue").and_then(Value::as_str) {
        return Value::String(ts.to_string());
    }
    if let Some(array) = map.get("arrayValue") {
        let items = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(from_firestore_value).collect())
            .unwrap_or_default();
        return Value::Array(items);
    }
    if let Some(inner) = map.get("mapValue") {
        return fields_from_document(inner.get("fields").unwrap_or(&Value::Null));
    }

    Value::Null
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_document_roundtrip() {
        let plain = json!({
            "id": "a1b2c3d4",
            "primaryName": "Air Jordan 1",
            "msrp": "170.00",
            "images": ["https://example.com/a1b2c3d4_image-0"],
            "inStock": true,
            "stockCount": 12,
        });
        let fields = plain.as_object().unwrap();

        let wire = fields_to_document(fields);
        assert_eq!(wire["primaryName"], json!({"stringValue": "Air Jordan 1"}));
        assert_eq!(wire["stockCount"], json!({"integerValue": "12"}));
        assert_eq!(wire["inStock"], json!({"booleanValue": true}));

        let back = fields_from_document(&wire);
        assert_eq!(back, plain);
    }

    #[test]
    fn test_empty_array_has_no_values_key() {
        // Firestore omits `values` for empty arrays
        let wire = json!({"products": {"arrayValue": {}}});
        let back = fields_from_document(&wire);
        assert_eq!(back, json!({"products": []}));
    }

    #[test]
    fn test_nested_map() {
        let plain = json!({"meta": {"colorway": "Bred", "year": 1985}});
        let wire = fields_to_document(plain.as_object().unwrap());
        let back = fields_from_document(&wire);
        assert_eq!(back, plain);
    }

    #[test]
    fn test_integer_as_bare_number_tolerated() {
        let wire = json!({"count": {"integerValue": 7}});
        let back = fields_from_document(&wire);
        assert_eq!(back, json!({"count": 7}));
    }
}
