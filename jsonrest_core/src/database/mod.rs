use indexmap::IndexMap;
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::EngineConfig,
    resource::{Document, Resource, ResourceKind},
};
use error::{DatabaseError, DbResult};
use page::{Page, Pagination, get_page, slice};
use query::Query;
use store::DocumentStore;
use value::id_matches;

pub mod error;
pub mod id;
pub mod page;
pub mod projection;
pub mod query;
pub mod relation;
pub mod sort;
pub mod store;
pub mod value;

/// Result of listing a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    pub items: Vec<Value>,
    /// Size of the filtered, sorted collection before slicing. Present
    /// whenever the query asked for pagination.
    pub total: Option<usize>,
    /// Navigation numbers, page mode only.
    pub page: Option<Page<()>>,
}

/// Result of a create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created {
    /// The stored document, or an array of them for bulk creates.
    pub value: Value,
    /// `<resource>/<id>` for a single collection document, `<resource>` for
    /// a singleton, absent for bulk creates.
    pub location: Option<String>,
}

fn object_body(body: Value) -> DbResult<Document> {
    match body {
        Value::Object(document) => Ok(document),
        _ => Err(DatabaseError::InvalidBody(
            "expected a JSON object".to_string(),
        )),
    }
}

/// Put the id first and drop any id the body carried.
fn with_id(id: Value, body: Document, id_field: &str) -> Document {
    let mut document = Map::new();
    document.insert(id_field.to_string(), id);
    for (key, value) in body {
        if key != id_field {
            document.insert(key, value);
        }
    }
    document
}

fn insert(documents: &mut Vec<Document>, body: Document, id_field: &str) -> Document {
    let id = id::create_id(documents, id_field);
    let document = with_id(id, body, id_field);
    documents.push(document.clone());
    document
}

/// The query and mutation engine over a [`DocumentStore`].
#[derive(Debug)]
pub struct Database {
    store: DocumentStore,
    config: EngineConfig,
}

impl Database {
    pub fn new(store: DocumentStore, config: EngineConfig) -> Self {
        Database { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn kind(&self, name: &str) -> Option<ResourceKind> {
        self.store.get(name).map(Resource::kind)
    }

    /// Names and kinds of every resource, in tree order.
    pub fn resources(&self) -> Vec<(String, ResourceKind)> {
        self.store
            .resources()
            .iter()
            .map(|(name, resource)| (name.clone(), resource.kind()))
            .collect()
    }

    /// Deep copy of the whole tree.
    pub fn state(&self) -> Value {
        self.store.state()
    }

    /// Replace the whole tree and persist it.
    pub fn set_state(&mut self, tree: Value) -> DbResult<()> {
        let snapshot = self.snapshot();
        self.store.set_state(tree)?;
        self.commit(snapshot)
    }

    /// Persist the current tree. Nothing to do for in-memory stores.
    pub fn write(&self) -> DbResult<()> {
        self.store.write()
    }

    /// Copy of the resources to fall back on when a write fails. In-memory
    /// stores never fail to write.
    fn snapshot(&self) -> Option<IndexMap<String, Resource>> {
        self.store.path().map(|_| self.store.resources().clone())
    }

    /// Persist a mutation. On failure the tree goes back to `snapshot`, so
    /// memory never holds changes the file does not.
    fn commit(&mut self, snapshot: Option<IndexMap<String, Resource>>) -> DbResult<()> {
        if let Err(err) = self.store.write() {
            error!("Failed to persist, rolling back: {err}");
            if let Some(snapshot) = snapshot {
                *self.store.resources_mut() = snapshot;
            }
            return Err(err);
        }
        Ok(())
    }

    fn relate(&self, document: Document, name: &str, query: &Query) -> Document {
        let resources = self.store.resources();
        let document = relation::embed(document, name, resources, &self.config, &query.embed);
        relation::expand(document, resources, &self.config, &query.expand)
    }

    /// Filter, sort, paginate, relate and project a collection. `None` when
    /// `name` is not a collection.
    pub fn list(&self, name: &str, query: &Query) -> Option<ListResult> {
        let documents = self.store.get(name)?.as_collection()?;
        let query = query.clone().retain_known(documents);

        let filtered: Vec<Document> = documents
            .iter()
            .filter(|document| query.matches(document))
            .cloned()
            .collect();
        let sorted = sort::apply_ordering(filtered, &query.order);
        let total = (!query.pagination.is_none()).then_some(sorted.len());

        let (items, page) = match query.pagination {
            Pagination::Page { page, limit } => {
                let page = get_page(&sorted, page, limit);
                let numbers = Page {
                    items: vec![],
                    current: page.current,
                    first: page.first,
                    prev: page.prev,
                    next: page.next,
                    last: page.last,
                };
                (page.items, Some(numbers))
            }
            Pagination::Slice { start, end } => (slice(&sorted, start, end), None),
            Pagination::Limit { start, limit } => (
                slice(&sorted, start, start.saturating_add(limit)),
                None,
            ),
            Pagination::None => (sorted, None),
        };

        let items = items
            .into_iter()
            .map(|document| {
                let document = self.relate(document, name, &query);
                Value::Object(projection::pick(document, &query.fields))
            })
            .collect();
        trace!("Listed {name}: {total:?} total");

        Some(ListResult { items, total, page })
    }

    /// A collection document by id, or a singleton when `id` is `None`.
    pub fn show(&self, name: &str, id: Option<&str>, query: &Query) -> Option<Value> {
        let document = match (self.store.get(name)?, id) {
            (Resource::Collection(documents), Some(id)) => documents
                .iter()
                .find(|document| id_matches(document, &self.config.id_field, id))?,
            (Resource::Singleton(document), None) => document,
            _ => return None,
        };
        let document = self.relate(document.clone(), name, query);
        Some(Value::Object(projection::pick(document, &query.fields)))
    }

    /// Insert one document or an array of documents into a collection, or
    /// replace a singleton. Ids are always assigned here.
    pub fn create(&mut self, name: &str, body: Value) -> DbResult<Option<Created>> {
        let fake = self.config.fake;
        let id_field = self.config.id_field.clone();
        let snapshot = if fake { None } else { self.snapshot() };
        let created = match self.store.get_mut(name) {
            None => return Ok(None),
            Some(Resource::Singleton(document)) => {
                let body = object_body(body)?;
                if !fake {
                    *document = body.clone();
                }
                Created {
                    value: Value::Object(body),
                    location: Some(name.to_string()),
                }
            }
            Some(Resource::Collection(documents)) => {
                let mut scratch;
                let target = if fake {
                    scratch = documents.clone();
                    &mut scratch
                } else {
                    documents
                };
                match body {
                    Value::Array(bodies) => {
                        let bodies = bodies
                            .into_iter()
                            .map(object_body)
                            .collect::<DbResult<Vec<_>>>()?;
                        let inserted = bodies
                            .into_iter()
                            .map(|body| Value::Object(insert(target, body, &id_field)))
                            .collect();
                        Created {
                            value: Value::Array(inserted),
                            location: None,
                        }
                    }
                    body => {
                        let document = insert(target, object_body(body)?, &id_field);
                        let location = document
                            .get(&id_field)
                            .map(|id| format!("{name}/{}", value::stringify(id)));
                        Created {
                            value: Value::Object(document),
                            location,
                        }
                    }
                }
            }
        };
        if !fake {
            self.commit(snapshot)?;
        }
        debug!("Created in {name}: {:?}", created.location);
        Ok(Some(created))
    }

    /// Replace (`partial == false`) or merge (`partial == true`) a collection
    /// document, or a singleton when `id` is `None`. The target's id is kept.
    pub fn update(
        &mut self,
        name: &str,
        id: Option<&str>,
        body: Value,
        partial: bool,
    ) -> DbResult<Option<Value>> {
        let fake = self.config.fake;
        let id_field = self.config.id_field.clone();
        let body = object_body(body)?;
        let snapshot = if fake { None } else { self.snapshot() };

        let target = match (self.store.get_mut(name), id) {
            (Some(Resource::Collection(documents)), Some(id)) => {
                match documents
                    .iter_mut()
                    .find(|document| id_matches(document, &id_field, id))
                {
                    Some(document) => document,
                    None => return Ok(None),
                }
            }
            (Some(Resource::Singleton(document)), None) => document,
            _ => return Ok(None),
        };

        let updated = if partial {
            let mut merged = target.clone();
            for (key, value) in body {
                if key != id_field || id.is_none() {
                    merged.insert(key, value);
                }
            }
            merged
        } else if id.is_some() {
            match target.get(&id_field).cloned() {
                Some(existing) => with_id(existing, body, &id_field),
                None => body,
            }
        } else {
            body
        };

        if !fake {
            *target = updated.clone();
            self.commit(snapshot)?;
        }
        debug!("Updated {name} {id:?}");
        Ok(Some(Value::Object(updated)))
    }

    /// Remove a collection document by id, then every document left with a
    /// dangling reference. `false` when there was nothing to remove.
    pub fn delete(&mut self, name: &str, id: &str) -> DbResult<bool> {
        let id_field = &self.config.id_field;
        let Some(position) = self
            .store
            .get(name)
            .and_then(Resource::as_collection)
            .and_then(|documents| {
                documents
                    .iter()
                    .position(|document| id_matches(document, id_field, id))
            })
        else {
            return Ok(false);
        };
        if self.config.fake {
            return Ok(true);
        }

        let snapshot = self.snapshot();
        if let Some(documents) = self
            .store
            .get_mut(name)
            .and_then(Resource::as_collection_mut)
        {
            documents.remove(position);
        }
        let dependents = relation::sweep(self.store.resources_mut(), &self.config);
        self.commit(snapshot)?;
        debug!("Deleted {name} {id}, removed {dependents} dependent document(s)");
        Ok(true)
    }
}
