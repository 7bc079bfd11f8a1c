use reqwest::Method;

use super::segment;
use crate::client::FarmClient;
use crate::error::Result;
use crate::types::*;

impl FarmClient {
    // ==================== Reminders ====================

    /// All reminders, optionally restricted to one type
    pub async fn fetch_reminders(&self, reminder_type: Option<&ReminderType>) -> Result<Vec<Reminder>> {
        let query: Vec<(&str, String)> = reminder_type
            .map(|t| ("type", t.as_str().to_string()))
            .into_iter()
            .collect();
        self.get("reminders", &query).await
    }

    pub async fn fetch_reminders_by_plot(&self, plot_id: Id) -> Result<Vec<Reminder>> {
        self.get(&format!("reminders/plot/{}", segment(plot_id)), &[])
            .await
    }

    /// Reminders due within the next `days` days
    pub async fn fetch_upcoming_reminders(
        &self,
        days: u32,
        reminder_type: Option<&ReminderType>,
    ) -> Result<Vec<Reminder>> {
        let mut query = vec![("days", days.to_string())];
        if let Some(t) = reminder_type {
            query.push(("type", t.as_str().to_string()));
        }
        self.get("reminders/upcoming", &query).await
    }

    pub async fn create_reminder(&self, reminder: &NewReminder) -> Result<Reminder> {
        self.send_json(Method::POST, "reminders", reminder).await
    }

    /// Flag a reminder as completed
    pub async fn mark_reminder_done(&self, id: Id) -> Result<()> {
        self.send_empty(Method::PATCH, &format!("reminders/{}/done", segment(id)))
            .await
    }
}
