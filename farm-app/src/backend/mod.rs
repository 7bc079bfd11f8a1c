//! Data source abstraction for the view models.
//!
//! - `FarmClient` talks to the real REST API
//! - `MockBackend` keeps everything in memory for tests and demos

pub mod http;
pub mod mock;
pub mod traits;

pub use mock::MockBackend;
pub use traits::FarmBackend;
