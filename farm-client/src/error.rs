//! Error types for the farm client

use thiserror::Error;

/// Farm client error
#[derive(Debug, Error)]
pub enum FarmError {
    /// HTTP request failed (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-2xx status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Server returned 401; the stored token has been cleared
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Envelope carried `success: false`; empty when the server gave no message
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token store could not be read or written
    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),
}

impl FarmError {
    /// Short message suitable for an error banner.
    ///
    /// Server-provided messages are surfaced as-is; transport failures
    /// collapse to a generic string.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            Self::Http(_) => "Could not reach the server".to_string(),
            Self::Json(_) | Self::InvalidResponse(_) => {
                "The server sent an unexpected response".to_string()
            }
            Self::Server { message, .. } if !message.is_empty() => message.clone(),
            Self::Server { status, .. } => format!("Request failed ({})", status),
            Self::Unauthorized(_) => "Unauthorized - please login".to_string(),
            Self::NotFound(what) => format!("{} not found", what),
            Self::Rejected(message) if !message.is_empty() => message.clone(),
            Self::Rejected(_) => "Request failed".to_string(),
            Self::Config(message) => message.clone(),
            Self::TokenStore(_) => "Could not access the saved session".to_string(),
        }
    }

    /// Whether the error means the session is no longer valid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// Result type for farm client operations
pub type Result<T> = std::result::Result<T, FarmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_preferred() {
        let err = FarmError::Server {
            status: 400,
            message: "Plot name already taken".into(),
        };
        assert_eq!(err.user_message(), "Plot name already taken");

        let err = FarmError::Server {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Request failed (502)");
    }

    #[test]
    fn test_unauthorized_flag() {
        assert!(FarmError::Unauthorized("expired".into()).is_unauthorized());
        assert!(!FarmError::NotFound("Plot".into()).is_unauthorized());
    }
}
