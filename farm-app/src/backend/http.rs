//! `FarmBackend` over the REST client.

use async_trait::async_trait;
use farm_client::*;

use super::traits::FarmBackend;

#[async_trait]
impl FarmBackend for FarmClient {
    async fn fetch_plots(&self, query: &PlotQuery) -> Result<PlotPage> {
        FarmClient::fetch_plots(self, query).await
    }

    async fn fetch_plot(&self, id: Id) -> Result<Plot> {
        FarmClient::fetch_plot(self, id).await
    }

    async fn create_plot(&self, plot: &NewPlot) -> Result<Plot> {
        FarmClient::create_plot(self, plot).await
    }

    async fn update_plot(&self, id: Id, plot: &NewPlot) -> Result<Plot> {
        FarmClient::update_plot(self, id, plot).await
    }

    async fn delete_plot(&self, id: Id) -> Result<()> {
        FarmClient::delete_plot(self, id).await
    }

    async fn fetch_weather(&self) -> Result<Weather> {
        FarmClient::fetch_weather(self).await
    }

    async fn fetch_crops(&self) -> Result<Vec<Crop>> {
        FarmClient::fetch_crops(self).await
    }

    async fn fetch_caretakers(&self) -> Result<Vec<Caretaker>> {
        FarmClient::fetch_caretakers(self).await
    }

    async fn fetch_lifecycles_by_plot(&self, plot_id: Id) -> Result<Vec<LifecycleEvent>> {
        FarmClient::fetch_lifecycles_by_plot(self, plot_id).await
    }

    async fn fetch_fertilizers_by_plot(&self, plot_id: Id) -> Result<Vec<FertilizerRecord>> {
        FarmClient::fetch_fertilizers_by_plot(self, plot_id).await
    }

    async fn fetch_pesticides_by_plot(&self, plot_id: Id) -> Result<Vec<PesticideRecord>> {
        FarmClient::fetch_pesticides_by_plot(self, plot_id).await
    }

    async fn fetch_irrigations_by_plot(&self, plot_id: Id) -> Result<Vec<IrrigationRecord>> {
        FarmClient::fetch_irrigations_by_plot(self, plot_id).await
    }

    async fn fetch_expenses_by_plot(&self, plot_id: Id) -> Result<Vec<ExpenseRecord>> {
        FarmClient::fetch_expenses_by_plot(self, plot_id).await
    }

    async fn fetch_reminders(&self, reminder_type: Option<&ReminderType>) -> Result<Vec<Reminder>> {
        FarmClient::fetch_reminders(self, reminder_type).await
    }

    async fn fetch_upcoming_reminders(&self, days: u32) -> Result<Vec<Reminder>> {
        FarmClient::fetch_upcoming_reminders(self, days, None).await
    }

    async fn mark_reminder_done(&self, id: Id) -> Result<()> {
        FarmClient::mark_reminder_done(self, id).await
    }
}
