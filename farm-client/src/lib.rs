//! Rust client SDK for the farm management REST API
//!
//! # Example
//!
//! ```rust,no_run
//! use farm_client::{ClientConfig, FarmClient, FileTokenStore, LoginRequest, Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new(FileTokenStore::new("session.json"));
//! let client = FarmClient::new(ClientConfig::from_env()?, session)?;
//!
//! client
//!     .login(&LoginRequest {
//!         email: "farmer@example.com".into(),
//!         password: "secret".into(),
//!     })
//!     .await?;
//!
//! let weather = client.fetch_weather().await?;
//! println!("{}°C", weather.temperature);
//! # Ok(())
//! # }
//! ```

mod api;
pub mod client;
pub mod config;
pub mod dates;
pub mod error;
pub mod session;
pub mod types;

// Re-export main types
pub use client::FarmClient;
pub use config::ClientConfig;
pub use error::{FarmError, Result};
pub use session::{
    decode_claims, is_token_valid, Claims, FileTokenStore, MemoryTokenStore, Session,
    SessionEvent, TokenStore, TOKEN_KEY,
};
pub use types::*;
