//! Error types for the document model

use thiserror::Error;

/// Result type alias for document loading
pub type SpecResult<T> = std::result::Result<T, SpecError>;

/// Document loading errors
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Invalid OpenAPI document: {0}")]
    InvalidFormat(String),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}
