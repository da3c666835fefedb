use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::database::error::{DatabaseError, DbResult};

/// A single JSON object stored in a resource.
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Collection,
    Singleton,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ResourceKind::Collection => write!(f, "collection"),
            ResourceKind::Singleton => write!(f, "singleton"),
        }
    }
}

/// A top-level entry of the document tree. The variant is fixed when the tree
/// is loaded and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resource {
    Collection(Vec<Document>),
    Singleton(Document),
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Resource {
    /// Validate one top-level value of the tree.
    pub fn from_value(name: &str, value: Value) -> DbResult<Self> {
        match value {
            Value::Object(document) => Ok(Resource::Singleton(document)),
            Value::Array(values) => values
                .into_iter()
                .map(|value| match value {
                    Value::Object(document) => Ok(document),
                    other => Err(DatabaseError::InvalidDocument {
                        resource: name.to_string(),
                        kind: type_name(&other),
                    }),
                })
                .collect::<DbResult<Vec<_>>>()
                .map(Resource::Collection),
            other => Err(DatabaseError::UnsupportedResource {
                name: name.to_string(),
                kind: type_name(&other),
            }),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Collection(_) => ResourceKind::Collection,
            Resource::Singleton(_) => ResourceKind::Singleton,
        }
    }

    pub fn as_collection(&self) -> Option<&Vec<Document>> {
        match self {
            Resource::Collection(documents) => Some(documents),
            Resource::Singleton(_) => None,
        }
    }

    pub fn as_collection_mut(&mut self) -> Option<&mut Vec<Document>> {
        match self {
            Resource::Collection(documents) => Some(documents),
            Resource::Singleton(_) => None,
        }
    }

    pub fn as_singleton(&self) -> Option<&Document> {
        match self {
            Resource::Singleton(document) => Some(document),
            Resource::Collection(_) => None,
        }
    }

    pub fn as_singleton_mut(&mut self) -> Option<&mut Document> {
        match self {
            Resource::Singleton(document) => Some(document),
            Resource::Collection(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Resource::Collection(documents) => Value::Array(
                documents
                    .iter()
                    .map(|document| Value::Object(document.clone()))
                    .collect(),
            ),
            Resource::Singleton(document) => Value::Object(document.clone()),
        }
    }
}
