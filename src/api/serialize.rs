//! Stored documents to JSON-safe output.

use bson::{Bson, Document};
use chrono::SecondsFormat;
use serde_json::{Map, Value};

/// Renames the top-level `_id` to a string `id` and renders every timestamp
/// as ISO-8601. `None` passes through as `null`.
pub fn serialize_record(doc: Option<Document>) -> Value {
    let Some(doc) = doc else { return Value::Null };
    let mut out = Map::with_capacity(doc.len());
    let mut id = None;
    for (key, value) in doc {
        if key == "_id" {
            id = Some(id_string(value));
        } else {
            out.insert(key, to_json(value));
        }
    }
    if let Some(id) = id {
        out.insert("id".to_string(), Value::String(id));
    }
    Value::Object(out)
}

fn id_string(id: Bson) -> String {
    match to_json(id) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true)),
        Bson::Document(doc) => Value::Object(doc.into_iter().map(|(k, v)| (k, to_json(v))).collect()),
        Bson::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
