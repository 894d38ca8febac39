use thiserror::Error;

/// Errors raised while reading or validating document data
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
