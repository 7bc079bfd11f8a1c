use reqwest::Method;

use super::segment;
use crate::client::FarmClient;
use crate::error::Result;
use crate::types::*;

impl FarmClient {
    // ==================== Plots ====================

    /// List plots with pagination, sorting and filters
    pub async fn fetch_plots(&self, query: &PlotQuery) -> Result<PlotPage> {
        let payload = self.get_payload("plots", &query.to_pairs()).await?;
        let envelope_pagination = payload.pagination;
        let listing: PlotListing = payload.into_typed()?;
        Ok(into_page(listing, envelope_pagination, query.page))
    }

    /// List plots with the given status
    pub async fn fetch_plots_by_status(
        &self,
        status: &PlotStatus,
        page: Option<u32>,
    ) -> Result<PlotPage> {
        let path = format!("plots/status/{}", segment(status));
        let query: Vec<(&str, String)> = page.map(|p| ("page", p.to_string())).into_iter().collect();

        let payload = self.get_payload(&path, &query).await?;
        let envelope_pagination = payload.pagination;
        let listing: PlotListing = payload.into_typed()?;
        Ok(into_page(listing, envelope_pagination, page))
    }

    /// Get a single plot
    pub async fn fetch_plot(&self, id: Id) -> Result<Plot> {
        self.get(&format!("plots/{}", segment(id)), &[]).await
    }

    /// Create a plot
    pub async fn create_plot(&self, plot: &NewPlot) -> Result<Plot> {
        self.send_json(Method::POST, "plots", plot).await
    }

    /// Replace a plot's editable fields
    pub async fn update_plot(&self, id: Id, plot: &NewPlot) -> Result<Plot> {
        self.send_json(Method::PUT, &format!("plots/{}", segment(id)), plot)
            .await
    }

    /// Delete a plot
    pub async fn delete_plot(&self, id: Id) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("plots/{}", segment(id)))
            .await
    }
}

/// Normalize both listing shapes into a page.
///
/// Without any pagination block the result is treated as the only page.
fn into_page(listing: PlotListing, outer: Option<Pagination>, requested: Option<u32>) -> PlotPage {
    let (plots, inner) = match listing {
        PlotListing::Empty => (Vec::new(), None),
        PlotListing::Plain(plots) => (plots, None),
        PlotListing::Paged { plots, pagination } => (plots, pagination),
    };

    let pagination = inner.or(outer).unwrap_or_else(|| {
        let page = requested.unwrap_or(1);
        Pagination {
            page,
            limit: plots.len() as u32,
            total: plots.len() as u64,
            total_pages: page,
        }
    });

    PlotPage { plots, pagination }
}
