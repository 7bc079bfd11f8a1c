//! Client configuration
//!
//! The API base URL is resolved here and nowhere else.

use crate::error::{FarmError, Result};
use reqwest::Url;

/// Environment variable holding the API base URL
pub const API_BASE_ENV: &str = "FARM_API_BASE";

/// Environment variable holding the request timeout in seconds
pub const TIMEOUT_ENV: &str = "FARM_REQUEST_TIMEOUT_SECS";

/// Base URL used when nothing is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/v1";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the farm REST API (e.g. "http://localhost:5000/v1")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given base URL with default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Build a config from `FARM_API_BASE` / `FARM_REQUEST_TIMEOUT_SECS`.
    ///
    /// Unset variables fall back to the defaults; a malformed timeout is an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                config.base_url = base;
            }
        }

        if let Ok(timeout) = std::env::var(TIMEOUT_ENV) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                FarmError::Config(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?;
        }

        config.validated()
    }

    /// Check the base URL and normalize it (no trailing slash)
    pub fn validated(mut self) -> Result<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();

        let url = Url::parse(&trimmed)
            .map_err(|e| FarmError::Config(format!("Invalid API base URL '{}': {}", trimmed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FarmError::Config(format!(
                "API base URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 {
            return Err(FarmError::Config("Request timeout must be positive".into()));
        }

        self.base_url = trimmed;
        Ok(self)
    }

    /// Join a resource path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
