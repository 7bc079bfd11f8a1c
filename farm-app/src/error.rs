//! Error types for the farm application layer

use farm_client::FarmError;
use thiserror::Error;

use crate::forms::FieldErrors;
use crate::router::Route;

/// Application error
#[derive(Debug, Error)]
pub enum AppError {
    /// A remote call failed
    #[error(transparent)]
    Client(#[from] FarmError),

    /// Form input was rejected before submission
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    /// The view was closed while the operation was in flight
    #[error("Operation cancelled")]
    Cancelled,

    /// The route guard sent the visitor elsewhere
    #[error("Redirected to {0}")]
    Redirected(Route),

    /// A screen could not load its data
    #[error("Load failed: {0}")]
    Load(String),

    /// Command-line or environment configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Short message suitable for an error banner
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            Self::Validation(errors) => errors.to_string(),
            Self::Cancelled => "Cancelled".to_string(),
            Self::Redirected(Route::Login) => "Please log in first".to_string(),
            Self::Redirected(Route::Dashboard) => "Already signed in".to_string(),
            Self::Redirected(route) => format!("Redirected to {}", route),
            Self::Load(message) | Self::Config(message) => message.clone(),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;
