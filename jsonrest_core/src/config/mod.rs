use serde::{Deserialize, Serialize};

fn default_id_field() -> String {
    "id".to_string()
}

fn default_foreign_key_suffix() -> String {
    "Id".to_string()
}

/// Process wide engine settings. Every stage that needs to know how documents
/// are identified or related receives this value explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name of the identifying field on collection documents.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Appended to a singular resource name to form a reference field,
    /// `post` + `Id` -> `postId`.
    #[serde(default = "default_foreign_key_suffix")]
    pub foreign_key_suffix: String,
    /// Compute mutation results without touching the store.
    #[serde(default)]
    pub fake: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            id_field: default_id_field(),
            foreign_key_suffix: default_foreign_key_suffix(),
            fake: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_field(mut self, id_field: &str) -> Self {
        self.id_field = id_field.to_string();
        self
    }

    pub fn foreign_key_suffix(mut self, suffix: &str) -> Self {
        self.foreign_key_suffix = suffix.to_string();
        self
    }

    pub fn fake(mut self, fake: bool) -> Self {
        self.fake = fake;
        self
    }

    /// Reference field a child of `resource` carries, `posts` -> `postId`.
    pub fn foreign_key_for(&self, resource: &str) -> String {
        format!(
            "{}{}",
            crate::inflection::singularize(resource),
            self.foreign_key_suffix
        )
    }

    /// Resource a reference field points at, `postId` -> `posts`. Returns
    /// `None` when the field does not carry the suffix or is the bare suffix.
    pub fn referenced_resource(&self, field: &str) -> Option<String> {
        let stem = field.strip_suffix(self.foreign_key_suffix.as_str())?;
        if stem.is_empty() || self.foreign_key_suffix.is_empty() {
            return None;
        }
        Some(crate::inflection::pluralize(stem))
    }
}
