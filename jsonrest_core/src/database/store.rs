use fs2::FileExt;
use indexmap::IndexMap;
use log::*;
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::error::{DatabaseError, DbResult};
use crate::resource::Resource;

/// Where the tree came from and where writes go.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Memory,
    File(PathBuf),
}

/// Owns the document tree. Every top-level key is validated into a
/// [`Resource`] when the tree is loaded.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    resources: IndexMap<String, Resource>,
    source: Source,
}

fn validate(tree: Value) -> DbResult<IndexMap<String, Resource>> {
    let root = match tree {
        Value::Object(root) => root,
        Value::Null => Map::new(),
        Value::Array(_) => return Err(DatabaseError::InvalidRoot("an array")),
        _ => return Err(DatabaseError::InvalidRoot("a scalar")),
    };
    root.into_iter()
        .map(|(name, value)| Resource::from_value(&name, value).map(|resource| (name, resource)))
        .collect()
}

impl DocumentStore {
    /// Hold a tree in memory only. [`DocumentStore::write`] does nothing.
    pub fn from_value(tree: Value) -> DbResult<Self> {
        Ok(DocumentStore {
            resources: validate(tree)?,
            source: Source::Memory,
        })
    }

    /// Load a tree from a JSON file, creating the file with an empty tree when
    /// it does not exist.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let tree = match fs::OpenOptions::new().read(true).open(&path) {
            Ok(mut file) => {
                file.lock_shared()?;
                let mut buf = Vec::new();
                let read = file.read_to_end(&mut buf);
                FileExt::unlock(&file)?;
                read?;
                if buf.iter().all(|b| b.is_ascii_whitespace()) {
                    Value::Object(Map::new())
                } else {
                    serde_json::from_slice(&buf).map_err(|e| {
                        error!("Failed to read json from {path:?}.");
                        e
                    })?
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("Creating {path:?}");
                Value::Object(Map::new())
            }
            Err(err) => return Err(err.into()),
        };
        let store = DocumentStore {
            resources: validate(tree)?,
            source: Source::File(path),
        };
        if !store.path().is_some_and(Path::exists) {
            store.write()?;
        }
        Ok(store)
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::File(path) => Some(path),
            Source::Memory => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Resource> {
        self.resources.get_mut(name)
    }

    pub fn resources(&self) -> &IndexMap<String, Resource> {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut IndexMap<String, Resource> {
        &mut self.resources
    }

    /// Replace the whole tree. The new tree is validated like a loaded one.
    pub fn set_state(&mut self, tree: Value) -> DbResult<()> {
        self.resources = validate(tree)?;
        Ok(())
    }

    /// Deep copy of the tree as JSON.
    pub fn state(&self) -> Value {
        Value::Object(
            self.resources
                .iter()
                .map(|(name, resource)| (name.clone(), resource.to_value()))
                .collect(),
        )
    }

    /// Rewrite the backing file with the current tree. The tree goes to a
    /// shadow file first, which then replaces the source file.
    pub fn write(&self) -> DbResult<()> {
        let source_path = match &self.source {
            Source::File(path) => path,
            Source::Memory => return Ok(()),
        };

        let mut tmp_path = source_path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let serialized = serde_json::to_vec_pretty(&self.state())?;

        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| {
                error!("Failed to open temp path: {tmp_path:?}");
                e
            })?;

        tmp_file.lock_exclusive()?;
        tmp_file.write_all(&serialized)?;
        tmp_file.sync_all()?;
        FileExt::unlock(&tmp_file)?;
        drop(tmp_file);

        fs::rename(&tmp_path, source_path)?;
        trace!("Wrote {source_path:?}");
        Ok(())
    }
}
