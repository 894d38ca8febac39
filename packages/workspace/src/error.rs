use mailcraft_common::CommonError;
use mailcraft_compiler_html::CompileError;
use mailcraft_document::DocumentError;
use mailcraft_editor::EditorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Storage error: {0}")]
    Storage(#[from] CommonError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Persistence needs a tokio runtime")]
    NoRuntime,
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
