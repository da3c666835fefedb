use thiserror::Error;

pub type DbResult<T> = Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("The database root must be a JSON object, found {0}.")]
    InvalidRoot(&'static str),

    #[error("Type of \"{name}\" ({kind}) is not supported.")]
    UnsupportedResource { name: String, kind: &'static str },

    #[error("Documents in \"{resource}\" must be JSON objects, found {kind}.")]
    InvalidDocument {
        resource: String,
        kind: &'static str,
    },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Failed to access the database file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the database file: {0}")]
    Json(#[from] serde_json::Error),
}
