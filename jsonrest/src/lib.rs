//! Async access to a JSON document tree served as REST style resources.
//!
//! ```
//! # use jsonrest::*;
//! # use anyhow::Error;
//! # use serde_json::json;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let db = JsonRest::from_value(json!({ "posts": [] }), EngineConfig::default())?;
//! db.create("posts", json!({ "title": "hello" })).await?;
//! let posts = db.list_values("posts", &Query::new()).await?;
//! assert_eq!(posts, Some(vec![json!({ "id": 1, "title": "hello" })]));
//! # Ok(())
//! # }
//! ```

mod jsonrest;

pub use crate::jsonrest::JsonRest;
pub use jsonrest_core::{
    Created, DatabaseError, Document, DocumentStore, EngineConfig, FindManyOrder, Links,
    ListResult, Operator, OrderDirection, Page, Pagination, Predicate, Query, Resource,
    ResourceKind,
    database::value::id_value,
};
