// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CloneError>;

#[derive(Error, Debug)]
pub enum CloneError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication failed: {status}")]
    Auth { status: String },

    #[error("Unexpected response status: {status}")]
    HttpStatus { status: String },

    #[error("Refusing to follow pagination link to another host: {url}")]
    ForeignPageLink { url: String },

    #[error("Failed to decode repository listing: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Cannot create destination directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Repository name '{0}' is not a safe directory name")]
    InvalidRepositoryName(String),

    #[error("git clone of {url} failed: {message}")]
    Clone { url: String, message: String },

    #[error("git executable is not available: {0}")]
    GitUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CloneError {
    /// True for failures that happen before any network or filesystem work.
    pub fn is_usage(&self) -> bool {
        matches!(self, CloneError::Usage(_))
    }
}
