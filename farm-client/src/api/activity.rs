use reqwest::Method;

use super::segment;
use crate::client::FarmClient;
use crate::error::Result;
use crate::types::*;

impl FarmClient {
    // ==================== Fertilizers ====================

    pub async fn fetch_fertilizers(&self) -> Result<Vec<FertilizerRecord>> {
        self.get("fertilizers", &[]).await
    }

    pub async fn fetch_fertilizers_by_plot(&self, plot_id: Id) -> Result<Vec<FertilizerRecord>> {
        self.get(&format!("fertilizers/plot/{}", segment(plot_id)), &[])
            .await
    }

    pub async fn create_fertilizer(&self, record: &NewFertilizer) -> Result<FertilizerRecord> {
        self.send_json(Method::POST, "fertilizers", record).await
    }

    // ==================== Pesticides ====================

    pub async fn fetch_pesticides(&self) -> Result<Vec<PesticideRecord>> {
        self.get("pesticides", &[]).await
    }

    pub async fn fetch_pesticides_by_plot(&self, plot_id: Id) -> Result<Vec<PesticideRecord>> {
        self.get(&format!("pesticides/plot/{}", segment(plot_id)), &[])
            .await
    }

    pub async fn create_pesticide(&self, record: &NewPesticide) -> Result<PesticideRecord> {
        self.send_json(Method::POST, "pesticides", record).await
    }

    // ==================== Irrigation ====================

    pub async fn fetch_irrigations(&self) -> Result<Vec<IrrigationRecord>> {
        self.get("irrigation", &[]).await
    }

    pub async fn fetch_irrigations_by_plot(&self, plot_id: Id) -> Result<Vec<IrrigationRecord>> {
        self.get(&format!("irrigation/plot/{}", segment(plot_id)), &[])
            .await
    }

    pub async fn create_irrigation(&self, record: &NewIrrigation) -> Result<IrrigationRecord> {
        self.send_json(Method::POST, "irrigation", record).await
    }

    // ==================== Expenses ====================

    pub async fn fetch_expenses(&self) -> Result<Vec<ExpenseRecord>> {
        self.get("expenses", &[]).await
    }

    pub async fn fetch_expenses_by_plot(&self, plot_id: Id) -> Result<Vec<ExpenseRecord>> {
        self.get(&format!("expenses/plot/{}", segment(plot_id)), &[])
            .await
    }

    pub async fn create_expense(&self, record: &NewExpense) -> Result<ExpenseRecord> {
        self.send_json(Method::POST, "expenses", record).await
    }

    // ==================== Lifecycle events ====================

    pub async fn fetch_lifecycles(&self) -> Result<Vec<LifecycleEvent>> {
        self.get("lifecyclecrops", &[]).await
    }

    pub async fn fetch_lifecycle(&self, id: Id) -> Result<LifecycleEvent> {
        self.get(&format!("lifecyclecrops/{}", segment(id)), &[])
            .await
    }

    /// Lifecycle events recorded for one plot
    pub async fn fetch_lifecycles_by_plot(&self, plot_id: Id) -> Result<Vec<LifecycleEvent>> {
        self.get(&format!("lifecyclecrops/plot/{}", segment(plot_id)), &[])
            .await
    }

    pub async fn create_lifecycle(&self, event: &NewLifecycleEvent) -> Result<LifecycleEvent> {
        self.send_json(Method::POST, "lifecyclecrops", event).await
    }

    pub async fn update_lifecycle(
        &self,
        id: Id,
        event: &NewLifecycleEvent,
    ) -> Result<LifecycleEvent> {
        self.send_json(Method::PUT, &format!("lifecyclecrops/{}", segment(id)), event)
            .await
    }

    pub async fn delete_lifecycle(&self, id: Id) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("lifecyclecrops/{}", segment(id)))
            .await
    }
}
