//! Error types for the client

use thiserror::Error;

/// A required parameter was absent from the call arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required parameter: {name}{}", describe(.description))]
pub struct MissingParameterError {
    /// Parameter name
    pub name: String,
    /// Parameter description from the document
    pub description: Option<String>,
}

fn describe(description: &Option<String>) -> String {
    match description {
        Some(d) if !d.is_empty() => format!(" ({})", d),
        _ => String::new(),
    }
}

/// Failure of a bound operation call.
///
/// Transport failures are passed through untouched.
#[derive(Error, Debug)]
pub enum InvokeError<E> {
    #[error(transparent)]
    MissingParameter(#[from] MissingParameterError),

    #[error("Operation not found: {0}")]
    UnknownOperation(String),

    #[error(transparent)]
    Transport(E),
}

impl<E> InvokeError<E> {
    /// The missing parameter, if that is what failed
    pub fn missing_parameter(&self) -> Option<&MissingParameterError> {
        match self {
            InvokeError::MissingParameter(e) => Some(e),
            _ => None,
        }
    }

    /// The transport error, if the transport failed
    pub fn into_transport(self) -> Option<E> {
        match self {
            InvokeError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors from the HTTP transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No base URL configured and the document declares no servers")]
    MissingBaseUrl,
}

/// Errors loading client settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message() {
        let err = MissingParameterError {
            name: "rsid".to_string(),
            description: Some("Resource set id".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Missing required parameter: rsid (Resource set id)"
        );

        let err = MissingParameterError {
            name: "count".to_string(),
            description: None,
        };
        assert_eq!(err.to_string(), "Missing required parameter: count");
    }

    #[test]
    fn test_transport_error_is_transparent() {
        let err: InvokeError<TransportError> = InvokeError::Transport(TransportError::Status {
            status: 404,
            body: "not found".to_string(),
        });
        assert_eq!(err.to_string(), "HTTP 404 - not found");
        assert!(err.missing_parameter().is_none());
        assert!(matches!(
            err.into_transport(),
            Some(TransportError::Status { status: 404, .. })
        ));
    }
}
