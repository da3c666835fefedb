use std::io;

use crate::cli::Cli;

use super::database::Database;

#[derive(Clone)]
pub struct AppData {
    pub database: Database,
    pub read_only: bool,
    /// Milliseconds to wait before every request.
    pub delay: u64,
    pub quiet: bool,
}

impl AppData {
    pub fn new(cli: &Cli) -> Result<Self, std::io::Error> {
        let database = Database::open(&cli.source, cli.engine_config()).map_err(|e| {
            io::Error::other(format!("Failed to load {}: {}", cli.source.display(), e))
        })?;

        Ok(AppData {
            database,
            read_only: cli.read_only,
            delay: cli.delay.unwrap_or(0),
            quiet: cli.quiet,
        })
    }
}
