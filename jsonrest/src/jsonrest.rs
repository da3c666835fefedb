use anyhow::Error;
use jsonrest_core::{Created, Database, DocumentStore, EngineConfig, ListResult, Query, ResourceKind};
use log::*;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
pub struct JsonRest {
    db: Arc<RwLock<Database>>,
}

impl JsonRest {
    /// Open a JSON file. If the file does not exist, it will be created with
    /// an empty tree.
    ///
    /// The top-level keys of the file name the resources:
    ///
    /// ```json
    /// {
    ///     "posts": [{ "id": 1, "title": "hello" }],
    ///     "profile": { "name": "typicode" }
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<Self, Error> {
        debug!("Opening {:?}", path.as_ref());
        let store = DocumentStore::from_file(path)?;
        Ok(Self::with_store(store, config))
    }

    /// Serve a tree held in memory only.
    ///
    /// ```
    /// # use jsonrest::*;
    /// # use anyhow::Error;
    /// # use serde_json::json;
    /// # fn main() -> Result<(), Error> {
    /// let db = JsonRest::from_value(json!({ "posts": [] }), EngineConfig::default())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_value(tree: Value, config: EngineConfig) -> Result<Self, Error> {
        let store = DocumentStore::from_value(tree)?;
        Ok(Self::with_store(store, config))
    }

    pub fn with_store(store: DocumentStore, config: EngineConfig) -> Self {
        Self {
            db: Arc::new(RwLock::new(Database::new(store, config))),
        }
    }

    pub async fn config(&self) -> EngineConfig {
        self.db.read().await.config().clone()
    }

    pub async fn kind(&self, name: &str) -> Option<ResourceKind> {
        self.db.read().await.kind(name)
    }

    /// Every resource name with its kind, in file order.
    pub async fn resources(&self) -> Vec<(String, ResourceKind)> {
        self.db.read().await.resources()
    }

    /// List a collection with everything the query asks for. `None` when the
    /// collection does not exist.
    ///
    /// ```
    /// # use jsonrest::*;
    /// # use anyhow::Error;
    /// # use serde_json::json;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Error> {
    /// # let db = JsonRest::from_value(json!({ "posts": [
    /// #     { "id": 1, "views": 10 }, { "id": 2, "views": 30 }, { "id": 3, "views": 20 }
    /// # ] }), EngineConfig::default())?;
    /// let query = Query::new()
    ///     .filter("views_gte", "15")
    ///     .sort_by("views", OrderDirection::Descending)
    ///     .paginate(Pagination::Limit { start: 0, limit: 1 });
    /// let result = db.list("posts", &query).await.unwrap();
    /// assert_eq!(result.items, vec![json!({ "id": 2, "views": 30 })]);
    /// assert_eq!(result.total, Some(2));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, name: &str, query: &Query) -> Option<ListResult> {
        debug!("Listing {name}");
        let db = self.db.read().await;
        let result = db.list(name, query);
        trace!("Listed: {:?}", result);
        result
    }

    pub async fn list_values(&self, name: &str, query: &Query) -> Result<Option<Vec<Value>>, Error> {
        self.find_many::<Value>(name, query).await
    }

    /// [`JsonRest::list`] deserialized into `T`.
    pub async fn find_many<T>(&self, name: &str, query: &Query) -> Result<Option<Vec<T>>, Error>
    where
        T: DeserializeOwned,
    {
        let Some(result) = self.list(name, query).await else {
            return Ok(None);
        };
        let typed: Result<Vec<T>, _> = result.items.into_iter().map(serde_json::from_value).collect();
        Ok(Some(typed?))
    }

    /// A collection document by id, or the singleton when `id` is `None`.
    ///
    /// ```
    /// # use jsonrest::*;
    /// # use anyhow::Error;
    /// # use serde::Deserialize;
    /// # use serde_json::json;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Error> {
    /// # let db = JsonRest::from_value(json!({
    /// #     "posts": [{ "id": 1, "title": "hello" }],
    /// #     "comments": [{ "id": 1, "postId": 1 }]
    /// # }), EngineConfig::default())?;
    /// #[derive(Deserialize)]
    /// struct Comment {
    ///     post: serde_json::Value,
    /// }
    /// let comment = db
    ///     .show::<Comment>("comments", Some("1"), &Query::new().expand("post"))
    ///     .await?
    ///     .unwrap();
    /// assert_eq!(comment.post["title"], "hello");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn show<T>(&self, name: &str, id: Option<&str>, query: &Query) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
    {
        debug!("Showing {name} {id:?}");
        let db = self.db.read().await;
        let value = db.show(name, id, query);
        trace!("Found value: {:?}", value);
        match value {
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
            None => Ok(None),
        }
    }

    /// Insert a document, or an array of documents, into a collection. On a
    /// singleton the value is replaced instead. `None` when the resource does
    /// not exist.
    pub async fn create<K>(&self, name: &str, body: K) -> Result<Option<Created>, Error>
    where
        K: Serialize,
    {
        debug!("Creating in {name}");
        let body = serde_json::to_value(body)?;
        let mut db = self.db.write().await;
        let created = db.create(name, body)?;
        trace!("Created: {:?}", created);
        Ok(created)
    }

    /// Replace a document keeping its id, or replace the singleton when `id`
    /// is `None`.
    pub async fn replace<K>(&self, name: &str, id: Option<&str>, body: K) -> Result<Option<Value>, Error>
    where
        K: Serialize,
    {
        debug!("Replacing {name} {id:?}");
        let body = serde_json::to_value(body)?;
        let mut db = self.db.write().await;
        Ok(db.update(name, id, body, false)?)
    }

    /// Merge top-level fields into a document, or into the singleton when `id`
    /// is `None`.
    pub async fn patch<K>(&self, name: &str, id: Option<&str>, body: K) -> Result<Option<Value>, Error>
    where
        K: Serialize,
    {
        debug!("Patching {name} {id:?}");
        let body = serde_json::to_value(body)?;
        let mut db = self.db.write().await;
        Ok(db.update(name, id, body, true)?)
    }

    /// Remove a document and every document left referencing a missing one.
    pub async fn delete(&self, name: &str, id: &str) -> Result<bool, Error> {
        debug!("Deleting {name} {id}");
        let mut db = self.db.write().await;
        let deleted = db.delete(name, id)?;
        trace!("Deleted: {deleted}");
        Ok(deleted)
    }

    /// Deep copy of the whole tree.
    pub async fn state(&self) -> Value {
        self.db.read().await.state()
    }

    /// Replace the whole tree and persist it.
    pub async fn set_state(&self, tree: Value) -> Result<(), Error> {
        debug!("Replacing state");
        let mut db = self.db.write().await;
        db.set_state(tree)?;
        Ok(())
    }
}
