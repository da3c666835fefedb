//! Serve a JSON document tree as a queryable, mutable resource store.
//!
//! Top-level keys of the tree name resources. Arrays are collections of
//! documents addressed by id, objects are singletons. Reads run through a
//! filter, sort, paginate, relate and project pipeline; writes keep foreign
//! key references consistent and persist the tree back to its source.
//!
//! ```
//! use jsonrest_core::{Database, DocumentStore, EngineConfig, Query};
//! use serde_json::json;
//!
//! let store = DocumentStore::from_value(json!({
//!     "posts": [{ "id": 1, "title": "hello" }],
//!     "comments": [{ "id": 1, "postId": 1, "body": "first" }]
//! }))
//! .unwrap();
//! let database = Database::new(store, EngineConfig::default());
//!
//! let query = Query::new().embed("comments");
//! let post = database.show("posts", Some("1"), &query).unwrap();
//! assert_eq!(post["comments"][0]["body"], "first");
//! ```

pub mod config;
pub mod database;
pub mod inflection;
pub mod resource;

pub use crate::{
    config::EngineConfig,
    database::{
        Created, Database, ListResult,
        error::{DatabaseError, DbResult},
        page::{Links, Page, Pagination},
        query::{Operator, Predicate, Query},
        sort::{FindManyOrder, OrderDirection},
        store::DocumentStore,
    },
    resource::{Document, Resource, ResourceKind},
};
