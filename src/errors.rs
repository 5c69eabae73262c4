use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for DendroRingsR
#[derive(Error, Debug)]
pub enum DendroError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Annotation parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Malformed shape: {0}")]
    MalformedShape(String),

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("No late-wood boundaries found in annotation set")]
    EmptyBoundarySet,

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, DendroError>;
