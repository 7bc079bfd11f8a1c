use serde_json::Value;

use crate::client::FarmClient;
use crate::error::Result;
use crate::types::*;

impl FarmClient {
    // ==================== Reports ====================

    pub async fn fetch_financial_overview(&self, query: &ReportQuery) -> Result<Value> {
        self.get("reports/financial", &query.to_pairs()).await
    }

    /// Yield report, for one plot or all of them
    pub async fn fetch_crop_yield(&self, plot_id: Option<Id>) -> Result<Value> {
        let query: Vec<(&str, String)> = plot_id
            .map(|id| ("plot_id", id.to_string()))
            .into_iter()
            .collect();
        self.get("reports/crop-yield", &query).await
    }

    pub async fn fetch_resource_efficiency(&self, query: &ReportQuery) -> Result<Value> {
        self.get("reports/efficiency", &query.to_pairs()).await
    }

    pub async fn fetch_reports_dashboard(&self, query: &ReportQuery) -> Result<ReportsDashboard> {
        self.get("reports/dashboard", &query.to_pairs()).await
    }
}
