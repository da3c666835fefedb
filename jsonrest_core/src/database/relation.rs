use indexmap::IndexMap;
use log::*;
use serde_json::Value;

use super::value::{id_matches, stringify};
use crate::{
    config::EngineConfig,
    inflection::pluralize,
    resource::{Document, Resource},
};

/// Attach the children of `document` from each named collection. Children are
/// the documents whose `<singular resource><suffix>` field equals the parent's
/// id in string form. Collections that do not exist leave the document untouched.
pub fn embed(
    mut document: Document,
    resource: &str,
    resources: &IndexMap<String, Resource>,
    config: &EngineConfig,
    names: &[String],
) -> Document {
    if names.is_empty() {
        return document;
    }
    let foreign_key = config.foreign_key_for(resource);
    let parent_id = document
        .get(&config.id_field)
        .filter(|id| !id.is_null())
        .map(stringify);
    for name in names {
        let Some(children) = resources.get(name).and_then(Resource::as_collection) else {
            trace!("Nothing to embed from {name}");
            continue;
        };
        let matching = match &parent_id {
            Some(parent_id) => children
                .iter()
                .filter(|child| {
                    child
                        .get(&foreign_key)
                        .filter(|reference| !reference.is_null())
                        .is_some_and(|reference| stringify(reference) == *parent_id)
                })
                .map(|child| Value::Object(child.clone()))
                .collect(),
            None => vec![],
        };
        document.insert(name.clone(), Value::Array(matching));
    }
    document
}

/// Attach the parent each named relation points at. `post` reads `postId` off
/// the document and looks it up in `posts`. Dangling or absent references
/// leave the document untouched.
pub fn expand(
    mut document: Document,
    resources: &IndexMap<String, Resource>,
    config: &EngineConfig,
    names: &[String],
) -> Document {
    for name in names {
        let field = format!("{}{}", name, config.foreign_key_suffix);
        let reference = match document.get(&field) {
            Some(Value::Null) | None => continue,
            Some(reference) => stringify(reference),
        };
        let parent = resources
            .get(&pluralize(name))
            .and_then(Resource::as_collection)
            .and_then(|parents| {
                parents
                    .iter()
                    .find(|parent| id_matches(parent, &config.id_field, &reference))
            });
        if let Some(parent) = parent {
            document.insert(name.clone(), Value::Object(parent.clone()));
        }
    }
    document
}

/// Whether any reference field of `document` points at a missing document of
/// an existing collection.
fn is_dangling(
    document: &Document,
    resources: &IndexMap<String, Resource>,
    config: &EngineConfig,
) -> bool {
    document.iter().any(|(field, value)| {
        if value.is_null() {
            return false;
        }
        let Some(target) = config.referenced_resource(field) else {
            return false;
        };
        match resources.get(&target).and_then(Resource::as_collection) {
            Some(parents) => {
                let reference = stringify(value);
                !parents
                    .iter()
                    .any(|parent| id_matches(parent, &config.id_field, &reference))
            }
            None => false,
        }
    })
}

/// Positions of documents, per collection, whose references no longer
/// resolve.
pub fn removable(
    resources: &IndexMap<String, Resource>,
    config: &EngineConfig,
) -> Vec<(String, Vec<usize>)> {
    resources
        .iter()
        .filter_map(|(name, resource)| {
            let documents = resource.as_collection()?;
            let positions: Vec<usize> = documents
                .iter()
                .enumerate()
                .filter(|(_, document)| is_dangling(document, resources, config))
                .map(|(i, _)| i)
                .collect();
            if positions.is_empty() {
                None
            } else {
                Some((name.clone(), positions))
            }
        })
        .collect()
}

/// Remove dangling documents until none are left, so that removing a
/// grandparent also removes grandchildren. Returns how many were removed.
pub fn sweep(resources: &mut IndexMap<String, Resource>, config: &EngineConfig) -> usize {
    let mut removed = 0;
    loop {
        let pending = removable(resources, config);
        if pending.is_empty() {
            return removed;
        }
        for (name, positions) in pending {
            if let Some(documents) = resources
                .get_mut(&name)
                .and_then(Resource::as_collection_mut)
            {
                debug!("Removing {} dependent document(s) from {name}", positions.len());
                removed += positions.len();
                let mut index = 0;
                documents.retain(|_| {
                    let keep = !positions.contains(&index);
                    index += 1;
                    keep
                });
            }
        }
    }
}
