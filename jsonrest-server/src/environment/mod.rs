use std::path::PathBuf;

/// Variables loaded from a `.env` file before the command line is parsed, so
/// that `JSONREST_*` entries there act as flag defaults.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub dotenv_path: Option<PathBuf>,
}

impl Environment {
    pub fn load() -> Result<Self, dotenvy::Error> {
        match dotenvy::dotenv() {
            Ok(path) => Ok(Environment {
                dotenv_path: Some(path),
            }),
            Err(err) if err.not_found() => Ok(Environment::default()),
            Err(err) => Err(err),
        }
    }
}
