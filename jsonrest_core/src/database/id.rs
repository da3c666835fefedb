use serde_json::{Number, Value};
use ulid::Ulid;

use crate::resource::Document;

/// Next id for a collection: `1` when it holds no ids, `max + 1` when every id
/// is a number, otherwise a fresh random string.
pub fn create_id(documents: &[Document], id_field: &str) -> Value {
    let ids: Vec<&Value> = documents
        .iter()
        .filter_map(|document| document.get(id_field))
        .filter(|id| !id.is_null())
        .collect();
    if ids.is_empty() {
        return Value::from(1);
    }
    if !ids.iter().all(|id| id.is_number()) {
        return Value::String(Ulid::new().to_string().to_lowercase());
    }
    if ids.iter().all(|id| id.is_i64()) {
        let max = ids.iter().filter_map(|id| id.as_i64()).max().unwrap_or(0);
        return Value::from(max.saturating_add(1));
    }
    let max = ids
        .iter()
        .filter_map(|id| id.as_f64())
        .fold(f64::NEG_INFINITY, f64::max);
    Number::from_f64(max + 1.0)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(Ulid::new().to_string().to_lowercase()))
}
