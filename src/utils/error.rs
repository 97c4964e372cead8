// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 500 from the webhook

    #[error("Failed to parse webhook response: {0}")]
    Parse(String),
}

/// Raised only while building an extractor. Parsing a document never fails.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid label pattern for {field}: {reason}")]
    InvalidPattern { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid store key: {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Upstream interaction failed: {0}")]
    Upstream(#[from] UpstreamError), // Automatically convert webhook errors

    #[error("Extractor setup failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Output serialization failed: {0}")]
    Output(#[from] serde_json::Error),
}
