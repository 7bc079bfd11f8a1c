//! Core trait for farm data sources.

use async_trait::async_trait;
use farm_client::{
    Caretaker, Crop, ExpenseRecord, FertilizerRecord, Id, IrrigationRecord, LifecycleEvent,
    NewPlot, PesticideRecord, Plot, PlotPage, PlotQuery, Reminder, ReminderType, Result, Weather,
};

/// Everything the view models read or write.
///
/// Mirrors the subset of [`FarmClient`](farm_client::FarmClient) that screens
/// use, so views can be driven by an in-memory backend in tests.
#[async_trait]
pub trait FarmBackend: Send + Sync {
    async fn fetch_plots(&self, query: &PlotQuery) -> Result<PlotPage>;

    async fn fetch_plot(&self, id: Id) -> Result<Plot>;

    async fn create_plot(&self, plot: &NewPlot) -> Result<Plot>;

    async fn update_plot(&self, id: Id, plot: &NewPlot) -> Result<Plot>;

    async fn delete_plot(&self, id: Id) -> Result<()>;

    async fn fetch_weather(&self) -> Result<Weather>;

    async fn fetch_crops(&self) -> Result<Vec<Crop>>;

    async fn fetch_caretakers(&self) -> Result<Vec<Caretaker>>;

    async fn fetch_lifecycles_by_plot(&self, plot_id: Id) -> Result<Vec<LifecycleEvent>>;

    async fn fetch_fertilizers_by_plot(&self, plot_id: Id) -> Result<Vec<FertilizerRecord>>;

    async fn fetch_pesticides_by_plot(&self, plot_id: Id) -> Result<Vec<PesticideRecord>>;

    async fn fetch_irrigations_by_plot(&self, plot_id: Id) -> Result<Vec<IrrigationRecord>>;

    async fn fetch_expenses_by_plot(&self, plot_id: Id) -> Result<Vec<ExpenseRecord>>;

    async fn fetch_reminders(&self, reminder_type: Option<&ReminderType>) -> Result<Vec<Reminder>>;

    async fn fetch_upcoming_reminders(&self, days: u32) -> Result<Vec<Reminder>>;

    async fn mark_reminder_done(&self, id: Id) -> Result<()>;
}
