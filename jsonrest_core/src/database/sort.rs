use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use super::value::get_document_path;
use crate::resource::Document;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    /// `desc` in any case is descending, anything else ascending.
    pub fn parse(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("desc") {
            OrderDirection::Descending
        } else {
            OrderDirection::Ascending
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FindManyOrder {
    pub property: String,
    pub direction: OrderDirection,
}

/// Rank of a value's type when two values of different types meet.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        Value::Bool(_) => 2,
        Value::Array(_) | Value::Object(_) => 3,
        Value::Null => 4,
    }
}

/// Natural ordering of two resolved values. Missing and null values sort after
/// everything else. Mixed types order numbers, strings, booleans, then arrays
/// and objects, which tie among themselves.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Stable multi-key sort. Sorting by the last key first and the first key
/// last leaves ties of earlier keys broken by later ones.
pub fn apply_ordering(mut documents: Vec<Document>, order: &[FindManyOrder]) -> Vec<Document> {
    for FindManyOrder {
        property,
        direction,
    } in order.iter().rev()
    {
        documents.sort_by(|a, b| {
            let ord = compare_values(
                get_document_path(a, property),
                get_document_path(b, property),
            );
            match direction {
                OrderDirection::Ascending => ord,
                OrderDirection::Descending => ord.reverse(),
            }
        });
    }
    documents
}
