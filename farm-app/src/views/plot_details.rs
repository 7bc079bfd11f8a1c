//! Plot details: the plot itself, per-tab activity records and upcoming tasks

use chrono::{DateTime, Utc};
use farm_client::{
    ExpenseRecord, FertilizerRecord, Id, IrrigationRecord, LifecycleEvent, PesticideRecord, Plot,
    Reminder,
};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::backend::FarmBackend;
use crate::derived::{priority, Priority};
use crate::error::{AppError, Result};
use crate::scope::ViewScope;

/// Reminders further out than this are not shown as upcoming
pub const UPCOMING_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailTab {
    Lifecycle,
    Fertilizer,
    Pesticide,
    Irrigation,
    Expenses,
}

impl DetailTab {
    pub const ALL: [DetailTab; 5] = [
        Self::Lifecycle,
        Self::Fertilizer,
        Self::Pesticide,
        Self::Irrigation,
        Self::Expenses,
    ];
}

impl FromStr for DetailTab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lifecycle" => Ok(Self::Lifecycle),
            "fertilizer" | "fertilizers" => Ok(Self::Fertilizer),
            "pesticide" | "pesticides" => Ok(Self::Pesticide),
            "irrigation" => Ok(Self::Irrigation),
            "expense" | "expenses" => Ok(Self::Expenses),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

/// Records shown under one tab
#[derive(Debug, Clone, PartialEq)]
pub enum TabData {
    Lifecycle(Vec<LifecycleEvent>),
    Fertilizer(Vec<FertilizerRecord>),
    Pesticide(Vec<PesticideRecord>),
    Irrigation(Vec<IrrigationRecord>),
    Expenses(Vec<ExpenseRecord>),
}

impl TabData {
    pub fn len(&self) -> usize {
        match self {
            Self::Lifecycle(v) => v.len(),
            Self::Fertilizer(v) => v.len(),
            Self::Pesticide(v) => v.len(),
            Self::Irrigation(v) => v.len(),
            Self::Expenses(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingTask {
    pub reminder: Reminder,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotDetailsState {
    pub plot: Option<Plot>,
    pub loading: bool,
    pub error: Option<String>,
    pub tabs: HashMap<DetailTab, TabData>,
    pub upcoming: Vec<UpcomingTask>,
}

/// Plot and its lifecycle events, as shown on the timeline screen
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub plot: Plot,
    pub events: Vec<LifecycleEvent>,
}

pub struct PlotDetails {
    backend: Arc<dyn FarmBackend>,
    plot_id: Id,
    state: RwLock<PlotDetailsState>,
    scope: ViewScope,
}

impl PlotDetails {
    pub fn new(backend: Arc<dyn FarmBackend>, plot_id: Id) -> Self {
        Self {
            backend,
            plot_id,
            state: RwLock::new(PlotDetailsState::default()),
            scope: ViewScope::new(),
        }
    }

    pub async fn state(&self) -> PlotDetailsState {
        self.state.read().await.clone()
    }

    pub fn close(&self) {
        self.scope.close();
    }

    pub async fn load(&self) {
        let ticket = self.scope.begin();
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let Some(result) = self.scope.run(self.backend.fetch_plot(self.plot_id)).await else {
            return;
        };

        let mut state = self.state.write().await;
        if !self.scope.is_current(ticket) {
            return;
        }
        match result {
            Ok(plot) => state.plot = Some(plot),
            Err(e) => {
                error!(plot_id = self.plot_id, error = %e, "Error fetching plot details");
                state.plot = None;
                state.error = Some(e.user_message());
            }
        }
        state.loading = false;
    }

    /// Fetch one tab's records unless already loaded
    pub async fn open_tab(&self, tab: DetailTab) -> Result<TabData> {
        if let Some(data) = self.state.read().await.tabs.get(&tab) {
            return Ok(data.clone());
        }

        let data = self
            .scope
            .run(self.fetch_tab(tab))
            .await
            .ok_or(AppError::Cancelled)?
            .map_err(|e| {
                error!(plot_id = self.plot_id, tab = ?tab, error = %e, "Error loading tab");
                AppError::from(e)
            })?;

        if self.scope.is_closed() {
            return Err(AppError::Cancelled);
        }
        debug!(plot_id = self.plot_id, tab = ?tab, records = data.len(), "Tab loaded");
        self.state.write().await.tabs.insert(tab, data.clone());
        Ok(data)
    }

    /// Load every tab concurrently and report how many records each holds.
    ///
    /// A tab that fails to load is reported as `None`; the others still load.
    pub async fn tab_counts(&self) -> Vec<(DetailTab, Option<usize>)> {
        let loads = DetailTab::ALL.iter().map(|tab| async move {
            let count = self.open_tab(*tab).await.ok().map(|data| data.len());
            (*tab, count)
        });
        join_all(loads).await
    }

    async fn fetch_tab(&self, tab: DetailTab) -> farm_client::Result<TabData> {
        let id = self.plot_id;
        let backend = &self.backend;
        Ok(match tab {
            DetailTab::Lifecycle => TabData::Lifecycle(backend.fetch_lifecycles_by_plot(id).await?),
            DetailTab::Fertilizer => {
                TabData::Fertilizer(backend.fetch_fertilizers_by_plot(id).await?)
            }
            DetailTab::Pesticide => TabData::Pesticide(backend.fetch_pesticides_by_plot(id).await?),
            DetailTab::Irrigation => {
                TabData::Irrigation(backend.fetch_irrigations_by_plot(id).await?)
            }
            DetailTab::Expenses => TabData::Expenses(backend.fetch_expenses_by_plot(id).await?),
        })
    }

    /// Reminders for this plot due within the next week, soonest first
    pub async fn load_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<UpcomingTask>> {
        let reminders = self
            .scope
            .run(self.backend.fetch_upcoming_reminders(UPCOMING_DAYS))
            .await
            .ok_or(AppError::Cancelled)??;

        let mut mine: Vec<Reminder> = reminders
            .into_iter()
            .filter(|r| r.plot_id == self.plot_id)
            .collect();
        super::reminders::sort_by_due(&mut mine);

        let upcoming: Vec<UpcomingTask> = mine
            .into_iter()
            .map(|reminder| UpcomingTask {
                priority: priority(&reminder, now),
                reminder,
            })
            .collect();

        if !self.scope.is_closed() {
            self.state.write().await.upcoming = upcoming.clone();
        }
        Ok(upcoming)
    }

    /// Load the plot and its lifecycle events concurrently
    pub async fn timeline(&self) -> Result<Timeline> {
        let (plot, mut events) = self
            .scope
            .run(async {
                tokio::try_join!(
                    self.backend.fetch_plot(self.plot_id),
                    self.backend.fetch_lifecycles_by_plot(self.plot_id)
                )
            })
            .await
            .ok_or(AppError::Cancelled)?
            .map_err(|e| {
                error!(plot_id = self.plot_id, error = %e, "Error loading timeline");
                AppError::from(e)
            })?;

        // Undated events go last
        events.sort_by(|a, b| match (&a.date, &b.date) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(Timeline { plot, events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::fixtures;
    use chrono::Duration;

    #[tokio::test]
    async fn test_load_plot() {
        let details = PlotDetails::new(Arc::new(fixtures::demo_backend()), 2);
        details.load().await;
        let state = details.state().await;

        assert_eq!(state.plot.map(|p| p.name), Some("South Field B".to_string()));
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_missing_plot_sets_error() {
        let details = PlotDetails::new(Arc::new(MockBackend::new()), 5);
        details.load().await;
        let state = details.state().await;

        assert!(state.plot.is_none());
        assert_eq!(state.error.as_deref(), Some("Plot not found"));
    }

    #[tokio::test]
    async fn test_tabs_load_once() {
        let backend = Arc::new(fixtures::demo_backend());
        let details = PlotDetails::new(backend.clone(), 1);

        assert_eq!(details.state().await.tabs.len(), 0);
        let data = details.open_tab(DetailTab::Lifecycle).await.unwrap();
        assert_eq!(data.len(), 2);

        details.open_tab(DetailTab::Lifecycle).await.unwrap();
        assert_eq!(backend.call_count("fetch_lifecycles_by_plot"), 1);
        assert_eq!(backend.call_count("fetch_fertilizers_by_plot"), 0);

        assert!(details.open_tab(DetailTab::Expenses).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tab_counts_survive_one_failure() {
        let backend = fixtures::demo_backend().with_failure("fetch_pesticides_by_plot");
        let details = PlotDetails::new(Arc::new(backend), 1);

        let counts = details.tab_counts().await;
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[0], (DetailTab::Lifecycle, Some(2)));
        assert_eq!(counts[2], (DetailTab::Pesticide, None));
        assert_eq!(counts[4], (DetailTab::Expenses, Some(0)));
        assert_eq!(details.state().await.tabs.len(), 4);
    }

    #[tokio::test]
    async fn test_upcoming_filtered_to_plot_and_prioritized() {
        let now = Utc::now();
        let details = PlotDetails::new(Arc::new(fixtures::demo_backend()), 1);

        let upcoming = details.load_upcoming(now).await.unwrap();
        let ids: Vec<Id> = upcoming.iter().map(|t| t.reminder.id).collect();
        // Reminder 1 is due tomorrow, reminder 4 in three days
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(upcoming[0].priority, Priority::High);
        assert_eq!(upcoming[1].priority, Priority::Medium);
        assert_eq!(details.state().await.upcoming, upcoming);
    }

    #[tokio::test]
    async fn test_upcoming_excludes_far_reminders() {
        let far = (Utc::now() + Duration::days(20)).to_rfc3339();
        let backend = MockBackend::new().with_reminders(vec![fixtures::reminder(9, 3, &far)]);
        let details = PlotDetails::new(Arc::new(backend), 3);

        assert!(details.load_upcoming(Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timeline_orders_events() {
        let details = PlotDetails::new(Arc::new(fixtures::demo_backend()), 1);
        let timeline = details.timeline().await.unwrap();

        assert_eq!(timeline.plot.id, 1);
        let titles: Vec<&str> = timeline.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Sowed wheat", "First irrigation"]);
    }

    #[tokio::test]
    async fn test_timeline_fails_as_a_whole() {
        let backend = fixtures::demo_backend().with_failure("fetch_lifecycles_by_plot");
        let details = PlotDetails::new(Arc::new(backend), 1);
        assert!(details.timeline().await.is_err());
    }

    #[test]
    fn test_tab_names() {
        assert_eq!("Expenses".parse::<DetailTab>(), Ok(DetailTab::Expenses));
        assert_eq!("fertilizers".parse::<DetailTab>(), Ok(DetailTab::Fertilizer));
        assert!("harvest".parse::<DetailTab>().is_err());
    }
}
