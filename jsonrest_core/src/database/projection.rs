use serde_json::Value;

use crate::resource::Document;

/// Keep only the listed top-level fields. An empty list keeps everything.
pub fn pick(document: Document, fields: &[String]) -> Document {
    if fields.is_empty() {
        return document;
    }
    document
        .into_iter()
        .filter(|(key, _)| fields.contains(key))
        .collect()
}

/// [`pick`] applied to a document or to every document of an array.
pub fn project(value: Value, fields: &[String]) -> Value {
    if fields.is_empty() {
        return value;
    }
    match value {
        Value::Object(document) => Value::Object(pick(document, fields)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| project(item, fields))
                .collect(),
        ),
        other => other,
    }
}
