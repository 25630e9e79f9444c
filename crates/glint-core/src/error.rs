/// Core error types for the Glint renderer.
use std::path::PathBuf;

/// A specialized Result type for Glint operations.
pub type GlintResult<T> = Result<T, GlintError>;

/// Top-level error type encompassing all Glint subsystems.
#[derive(Debug, thiserror::Error)]
pub enum GlintError {
    #[error("render error: {0}")]
    Render(String),

    #[error("asset error: {message} ({path:?})")]
    Asset { message: String, path: PathBuf },

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GlintError {
    /// Create an asset error.
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        GlintError::Asset {
            message: message.into(),
            path: path.into(),
        }
    }
}
