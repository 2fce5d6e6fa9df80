//! Conversion between plain JSON and the Firestore REST value encoding.
//!
//! Firestore wraps every field in a typed envelope (`{"stringValue": "x"}`,
//! `{"integerValue": "42"}`, `{"mapValue": {"fields": {...}}}`). The rest of
//! the crate works in plain `serde_json::Value`; only this module knows the
//! wire shape.

use serde_json::{Map, Value, json};

/// Encode a JSON object as a Firestore `fields` map.
///
/// Non-object input encodes as an empty map; documents are always objects.
#[must_use]
pub fn to_document_fields(data: &Value) -> Value {
    let Value::Object(map) = data else {
        return json!({});
    };
    let fields: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.clone(), to_firestore_value(value)))
        .collect();
    Value::Object(fields)
}

/// Encode one JSON value in the Firestore envelope.
#[must_use]
pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => n.as_i64().map_or_else(
            // 64-bit integers travel as strings; everything else is a double
            || json!({ "doubleValue": n.as_f64() }),
            |i| json!({ "integerValue": i.to_string() }),
        ),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(to_firestore_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(key, value)| (key.clone(), to_firestore_value(value)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Decode a Firestore `fields` map back into a JSON object.
#[must_use]
pub fn from_document_fields(fields: &Value) -> Value {
    let Value::Object(map) = fields else {
        return json!({});
    };
    let decoded: Map<String, Value> = map
        .iter()
        .map(|(key, value)| (key.clone(), from_firestore_value(value)))
        .collect();
    Value::Object(decoded)
}

/// Decode one enveloped Firestore value.
#[must_use]
pub fn from_firestore_value(value: &Value) -> Value {
    let Value::Object(map) = value else {
        return Value::Null;
    };

    if let Some(b) = map.get("booleanValue") {
        return b.clone();
    }
    if let Some(i) = map.get("integerValue") {
        return i
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map_or(Value::Null, Value::from);
    }
    if let Some(d) = map.get("doubleValue") {
        return d.clone();
    }
    if let Some(s) = map.get("stringValue") {
        return s.clone();
    }
    if let Some(t) = map.get("timestampValue") {
        return t.clone();
    }
    if let Some(arr) = map.get("arrayValue") {
        let items = arr
            .get("values")
            .and_then(Value::as_array)
            .map_or_else(Vec::new, |values| {
                values.iter().map(from_firestore_value).collect()
            });
        return Value::Array(items);
    }
    if let Some(nested) = map.get("mapValue") {
        return from_document_fields(nested.get("fields").unwrap_or(&json!({})));
    }
    // nullValue or an envelope this client does not use
    Value::Null
}
