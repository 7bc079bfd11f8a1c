//! Pure display derivations over fetched records

pub mod crops;
pub mod display;
pub mod next_task;
pub mod priority;

/// Milliseconds in a day
pub(crate) const DAY_MS: i64 = 86_400_000;

pub use crops::{crop_label, CropCatalog};
pub use display::{
    last_activity_text, sort_plots, status_label, task_urgency, DashboardSummary, PlotSortKey,
    TaskUrgency,
};
pub use next_task::{days_since_planted, next_task};
pub use priority::{days_until_due, priority, Priority};
