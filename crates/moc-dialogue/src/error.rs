//! Dialogue engine error types.

use thiserror::Error;

/// Errors raised at the boundaries of the dialogue core (files, config,
/// external collaborators). None of them ever fails a user-facing turn.
#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("knowledge lookup failed: {0}")]
    Knowledge(String),

    #[error("stats sink failed: {0}")]
    Stats(String),
}

/// Convenience alias for dialogue core results.
pub type DialogueResult<T> = Result<T, DialogueError>;
