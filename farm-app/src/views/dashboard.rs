//! Dashboard view model: plots and weather with paging and filtering.

use chrono::{DateTime, Utc};
use farm_client::{Pagination, Plot, PlotQuery, PlotStatus, Weather};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::backend::FarmBackend;
use crate::derived::{
    last_activity_text, next_task, status_label, task_urgency, DashboardSummary, TaskUrgency,
};
use crate::scope::ViewScope;

pub const LOAD_ERROR: &str = "Failed to load dashboard data. Please try again later.";
pub const REFRESH_ERROR: &str = "Failed to refresh data. Please try again later.";
pub const FILTER_ERROR: &str = "Failed to filter plots. Please try again later.";
pub const LOAD_MORE_ERROR: &str = "Failed to load more plots. Please try again later.";

/// Snapshot of what the dashboard shows
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub plots: Vec<Plot>,
    pub weather: Option<Weather>,
    pub loading: bool,
    pub error: Option<String>,
    pub pagination: Pagination,
    /// Criteria of the current listing; its page is always unset
    pub filter: PlotQuery,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            plots: Vec::new(),
            weather: None,
            loading: true,
            error: None,
            pagination: Pagination::default(),
            filter: PlotQuery::default(),
        }
    }
}

impl DashboardState {
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::compute(&self.plots, self.weather.as_ref())
    }

    pub fn cards(&self, now: DateTime<Utc>) -> Vec<PlotCard> {
        self.plots.iter().map(|p| PlotCard::new(p, now)).collect()
    }
}

/// One plot as rendered on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotCard {
    pub id: farm_client::Id,
    pub name: String,
    pub acreage: f64,
    pub crop: String,
    pub caretaker: String,
    pub status: &'static str,
    pub next_task: &'static str,
    pub urgency: TaskUrgency,
    pub last_activity: String,
}

impl PlotCard {
    pub fn new(plot: &Plot, now: DateTime<Utc>) -> Self {
        let task = next_task(plot, now);
        Self {
            id: plot.id,
            name: plot.name.clone(),
            acreage: plot.acreage,
            crop: plot
                .crop_name()
                .filter(|c| !c.is_empty())
                .unwrap_or("No crop assigned")
                .to_string(),
            caretaker: plot
                .caretaker_name()
                .filter(|c| !c.is_empty())
                .unwrap_or("Not assigned")
                .to_string(),
            status: status_label(&plot.status),
            next_task: task,
            urgency: task_urgency(task),
            last_activity: last_activity_text(plot, now),
        }
    }
}

/// Keep only plots whose status equals `status`, in their original order
pub fn filter_by_status(plots: Vec<Plot>, status: Option<&PlotStatus>) -> Vec<Plot> {
    match status {
        Some(wanted) => plots.into_iter().filter(|p| &p.status == wanted).collect(),
        None => plots,
    }
}

/// Dashboard view model.
///
/// Loads run against a [`ViewScope`]: after [`close`](Self::close) nothing
/// in flight writes state, and a load superseded by a newer one is dropped.
pub struct Dashboard {
    backend: Arc<dyn FarmBackend>,
    state: RwLock<DashboardState>,
    scope: ViewScope,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn FarmBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(DashboardState::default()),
            scope: ViewScope::new(),
        }
    }

    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Stop all in-flight and future loads
    pub fn close(&self) {
        self.scope.close();
    }

    /// Initial load of plots and weather
    pub async fn load(&self) {
        self.load_all(LOAD_ERROR).await;
    }

    /// Reload plots (from page 1) and weather
    pub async fn refresh(&self) {
        self.load_all(REFRESH_ERROR).await;
    }

    async fn load_all(&self, failure: &str) {
        let ticket = self.scope.begin();
        let query = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
            state.filter.at_page(1)
        };

        let fetched = self
            .scope
            .run(async {
                tokio::try_join!(
                    self.backend.fetch_plots(&query),
                    self.backend.fetch_weather()
                )
            })
            .await;

        let Some(result) = fetched else {
            debug!("Dashboard closed during load");
            return;
        };

        let mut state = self.state.write().await;
        if !self.scope.is_current(ticket) {
            debug!("Discarding superseded dashboard load");
            return;
        }

        match result {
            Ok((page, weather)) => {
                state.plots = filter_by_status(page.plots, query.status.as_ref());
                state.pagination = page.pagination;
                state.weather = Some(weather);
            }
            Err(e) => {
                error!(error = %e, "Error loading dashboard data");
                state.plots.clear();
                state.weather = None;
                state.pagination = Pagination::default();
                state.error = Some(failure.to_string());
            }
        }
        state.loading = false;
    }

    /// Re-query plots with new criteria, starting again from page 1
    pub async fn filter_plots(&self, criteria: PlotQuery) {
        let ticket = self.scope.begin();
        let filter = PlotQuery {
            page: None,
            ..criteria
        };
        let query = filter.at_page(1);
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
            state.filter = filter;
        }

        let Some(result) = self.scope.run(self.backend.fetch_plots(&query)).await else {
            return;
        };

        let mut state = self.state.write().await;
        if !self.scope.is_current(ticket) {
            return;
        }

        match result {
            Ok(page) => {
                state.plots = filter_by_status(page.plots, query.status.as_ref());
                state.pagination = page.pagination;
            }
            Err(e) => {
                error!(error = %e, "Error filtering plots");
                state.plots.clear();
                state.pagination = Pagination::default();
                state.error = Some(FILTER_ERROR.to_string());
            }
        }
        state.loading = false;
    }

    /// Append the next page; does nothing on the last page
    pub async fn load_more_plots(&self) {
        let (query, ticket) = {
            let state = self.state.read().await;
            if state.pagination.page >= state.pagination.total_pages {
                return;
            }
            (
                state.filter.at_page(state.pagination.page + 1),
                self.scope.current(),
            )
        };

        let Some(result) = self.scope.run(self.backend.fetch_plots(&query)).await else {
            return;
        };

        let mut state = self.state.write().await;
        // A reload or refilter since we started invalidates the append
        if !self.scope.is_current(ticket) {
            return;
        }

        match result {
            Ok(page) => {
                let more = filter_by_status(page.plots, query.status.as_ref());
                state.plots.extend(more);
                state.pagination = page.pagination;
            }
            Err(e) => {
                error!(error = %e, "Error loading more plots");
                state.error = Some(LOAD_MORE_ERROR.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::fixtures;
    use std::time::Duration;

    fn dashboard(backend: MockBackend) -> (Arc<MockBackend>, Dashboard) {
        let backend = Arc::new(backend);
        (backend.clone(), Dashboard::new(backend))
    }

    #[tokio::test]
    async fn test_load_merges_plots_and_weather() {
        let (_, dash) = dashboard(fixtures::demo_backend());
        assert!(dash.state().await.loading);

        dash.load().await;
        let state = dash.state().await;

        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.plots.len(), 4);
        assert_eq!(state.weather, Some(fixtures::sample_weather()));
        assert_eq!(state.summary().total_acres, "15.7");
    }

    #[tokio::test]
    async fn test_failed_plot_fetch_clears_everything() {
        let (_, dash) = dashboard(fixtures::demo_backend().with_failure("fetch_plots"));
        dash.load().await;
        let state = dash.state().await;

        assert!(state.plots.is_empty());
        assert_eq!(state.weather, None);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(LOAD_ERROR));
    }

    #[tokio::test]
    async fn test_failed_weather_clears_plots_too() {
        let (backend, dash) = dashboard(fixtures::demo_backend());
        dash.load().await;
        assert_eq!(dash.state().await.plots.len(), 4);

        backend.set_failure("fetch_weather", true);
        dash.refresh().await;
        let state = dash.state().await;

        assert!(state.plots.is_empty());
        assert_eq!(state.error.as_deref(), Some(REFRESH_ERROR));

        // Try again
        backend.set_failure("fetch_weather", false);
        dash.refresh().await;
        let state = dash.state().await;
        assert_eq!(state.error, None);
        assert_eq!(state.plots.len(), 4);
    }

    #[tokio::test]
    async fn test_filter_by_status_preserves_order() {
        let mut plots = fixtures::sample_plots();
        plots.push(fixtures::plot(9, "Z Field", "harvested"));
        plots.insert(0, fixtures::plot(8, "A Field", "harvested"));
        let (backend, dash) = dashboard(MockBackend::new().with_plots(plots));

        dash.filter_plots(PlotQuery::with_status(PlotStatus::Harvested))
            .await;
        let state = dash.state().await;

        let ids: Vec<i64> = state.plots.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![8, 4, 9]);
        assert!(state.plots.iter().all(|p| p.status == PlotStatus::Harvested));
        assert_eq!(state.filter.status, Some(PlotStatus::Harvested));
        assert_eq!(backend.call_count("fetch_weather"), 0);
    }

    #[tokio::test]
    async fn test_load_more_until_last_page() {
        let (backend, dash) = dashboard(fixtures::demo_backend().with_page_size(3));
        dash.load().await;
        assert_eq!(dash.state().await.plots.len(), 3);

        dash.load_more_plots().await;
        let state = dash.state().await;
        assert_eq!(state.plots.len(), 4);
        assert_eq!(state.pagination.page, 2);

        dash.load_more_plots().await;
        assert_eq!(dash.state().await.plots.len(), 4);
        assert_eq!(backend.call_count("fetch_plots"), 2);
    }

    #[tokio::test]
    async fn test_filter_resets_to_first_page() {
        let (_, dash) = dashboard(fixtures::demo_backend().with_page_size(2));
        dash.load().await;
        dash.load_more_plots().await;
        assert_eq!(dash.state().await.pagination.page, 2);

        dash.filter_plots(PlotQuery {
            page: Some(2),
            ..Default::default()
        })
        .await;
        let state = dash.state().await;
        assert_eq!(state.pagination.page, 1);
        assert_eq!(state.filter.page, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_discards_in_flight_load() {
        let backend = fixtures::demo_backend();
        backend.queue_delay("fetch_plots", Duration::from_secs(5));
        let (_, dash) = dashboard(backend);
        let dash = Arc::new(dash);

        let task = {
            let dash = dash.clone();
            tokio::spawn(async move { dash.load().await })
        };
        tokio::task::yield_now().await;
        dash.close();
        task.await.unwrap();

        let state = dash.state().await;
        assert!(state.plots.is_empty());
        assert!(state.weather.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_load_is_dropped() {
        let backend = fixtures::demo_backend();
        // First fetch is slow, second is immediate
        backend.queue_delay("fetch_plots", Duration::from_secs(5));
        backend.queue_delay("fetch_plots", Duration::from_millis(0));
        let (_, dash) = dashboard(backend);
        let dash = Arc::new(dash);

        let slow = {
            let dash = dash.clone();
            tokio::spawn(async move { dash.load().await })
        };
        tokio::task::yield_now().await;

        dash.filter_plots(PlotQuery::with_status(PlotStatus::Growing))
            .await;
        slow.await.unwrap();

        let state = dash.state().await;
        assert_eq!(state.plots.len(), 1);
        assert_eq!(state.plots[0].name, "North Field A");
        assert!(!state.loading);
    }

    #[test]
    fn test_cards_use_fallback_text() {
        let state = DashboardState {
            plots: vec![fixtures::plot(1, "Bare", "growing")],
            ..Default::default()
        };
        let card = &state.cards(Utc::now())[0];
        assert_eq!(card.crop, "No crop assigned");
        assert_eq!(card.caretaker, "Not assigned");
        assert_eq!(card.next_task, "Apply balanced fertilizer");
        assert_eq!(card.urgency, TaskUrgency::None);
    }
}
