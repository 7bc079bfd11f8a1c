//! Farm management application layer
//!
//! View models, display derivations, form validation and routing on top of
//! [`farm_client`]. Views talk to the API through the [`FarmBackend`] trait,
//! implemented by [`farm_client::FarmClient`] and by the in-memory
//! [`MockBackend`].
//!
//! # Example
//!
//! ```rust,no_run
//! use farm_app::{fixtures, views::Dashboard};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let dashboard = Dashboard::new(Arc::new(fixtures::demo_backend()));
//! dashboard.load().await;
//!
//! let state = dashboard.state().await;
//! println!("{} acres", state.summary().total_acres);
//! # }
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod derived;
pub mod error;
pub mod fixtures;
pub mod forms;
pub mod router;
pub mod scope;
pub mod views;

pub use backend::{FarmBackend, MockBackend};
pub use error::{AppError, Result};
pub use router::{guard, Navigation, Route};
pub use scope::ViewScope;
