use jsonrest::{EngineConfig, JsonRest};
use std::path::Path;

#[derive(Clone)]
pub struct Database {
    pub jsonrest: JsonRest,
}

impl Database {
    pub fn open(source: &Path, config: EngineConfig) -> Result<Self, anyhow::Error> {
        let jsonrest = JsonRest::open(source, config)?;

        Ok(Database { jsonrest })
    }

    #[cfg(test)]
    pub fn from_value(tree: serde_json::Value, config: EngineConfig) -> Result<Self, anyhow::Error> {
        let jsonrest = JsonRest::from_value(tree, config)?;

        Ok(Database { jsonrest })
    }
}
