use mailcraft_document::DocumentError;
use thiserror::Error;

/// Common error type that can hold any mailcraft error
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl From<String> for CommonError {
    fn from(s: String) -> Self {
        CommonError::Generic(s)
    }
}

impl From<&str> for CommonError {
    fn from(s: &str) -> Self {
        CommonError::Generic(s.to_string())
    }
}
