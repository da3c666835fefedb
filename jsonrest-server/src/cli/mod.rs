use std::path::PathBuf;

use clap::Parser;
use jsonrest::EngineConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "jsonrest", version, about = "Serve a JSON file as a REST API")]
pub struct Cli {
    /// JSON file holding the document tree. Created when missing.
    #[arg(env = "JSONREST_SOURCE", default_value = "db.json")]
    pub source: PathBuf,
    #[arg(long, short = 'H', env = "JSONREST_HOST", default_value = "localhost")]
    pub host: String,
    #[arg(long, short, env = "JSONREST_PORT", default_value = "3000")]
    pub port: u16,
    /// Answer writes without changing the file.
    #[arg(long, short, env = "JSONREST_FAKE")]
    pub fake: bool,
    /// Only allow GET requests.
    #[arg(long, env = "JSONREST_READ_ONLY")]
    pub read_only: bool,
    /// Milliseconds to wait before answering.
    #[arg(long, short, env = "JSONREST_DELAY")]
    pub delay: Option<u64>,
    #[arg(long, short, env = "JSONREST_ID", default_value = "id")]
    pub id: String,
    #[arg(long, env = "JSONREST_FOREIGN_KEY_SUFFIX", default_value = "Id")]
    pub foreign_key_suffix: String,
    /// Suppress request logs and the startup banner.
    #[arg(long, short, env = "JSONREST_QUIET")]
    pub quiet: bool,
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .id_field(&self.id)
            .foreign_key_suffix(&self.foreign_key_suffix)
            .fake(self.fake)
    }
}
