//! View models, one per screen.
//!
//! Each view holds its state behind a `tokio::sync::RwLock` and owns a
//! [`ViewScope`](crate::scope::ViewScope); `state()` returns a snapshot.

pub mod dashboard;
pub mod plot_details;
pub mod plots;
pub mod reminders;

pub use dashboard::{filter_by_status, Dashboard, DashboardState, PlotCard};
pub use plot_details::{DetailTab, PlotDetails, TabData, Timeline, UpcomingTask};
pub use plots::{EditorData, PlotEditor, PlotManager, PlotsList};
pub use reminders::{sort_by_due, RemindersView};
