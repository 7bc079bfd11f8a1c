//! Plot screens: the plot list, the editor and create/update/delete actions

use farm_client::{Caretaker, Crop, FarmError, Id, NewPlot, Plot, PlotQuery};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::backend::FarmBackend;
use crate::derived::CropCatalog;
use crate::error::{AppError, Result};
use crate::forms::PlotForm;
use crate::scope::ViewScope;

/// Message for a failed call, with `default` standing in when the server
/// rejected the request without saying why
fn failure_message(err: &FarmError, default: &str) -> String {
    match err {
        FarmError::Rejected(message) if message.is_empty() => default.to_string(),
        other => other.user_message(),
    }
}

// ============================================================================
// Plot management
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Create, update, delete and look up plots, tracking the last outcome
pub struct PlotManager {
    backend: Arc<dyn FarmBackend>,
    state: RwLock<ManagerState>,
    scope: ViewScope,
}

impl PlotManager {
    pub fn new(backend: Arc<dyn FarmBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(ManagerState::default()),
            scope: ViewScope::new(),
        }
    }

    pub async fn state(&self) -> ManagerState {
        self.state.read().await.clone()
    }

    pub fn close(&self) {
        self.scope.close();
    }

    async fn track<T>(
        &self,
        default_error: &str,
        call: impl std::future::Future<Output = farm_client::Result<T>>,
    ) -> Result<T> {
        let ticket = self.scope.begin();
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self.scope.run(call).await.ok_or(AppError::Cancelled)?;

        let mut state = self.state.write().await;
        let current = self.scope.is_current(ticket);
        if self.scope.is_closed() {
            return Err(AppError::Cancelled);
        }
        if current {
            state.loading = false;
        }
        result.map_err(|e| {
            error!(error = %e, "{}", default_error);
            if current {
                state.error = Some(failure_message(&e, default_error));
            }
            AppError::from(e)
        })
    }

    pub async fn create(&self, plot: &NewPlot) -> Result<Plot> {
        let created = self
            .track("Failed to create plot", self.backend.create_plot(plot))
            .await?;
        info!(plot_id = created.id, name = %created.name, "Plot created");
        Ok(created)
    }

    pub async fn update(&self, id: Id, plot: &NewPlot) -> Result<Plot> {
        self.track("Failed to update plot", self.backend.update_plot(id, plot))
            .await
    }

    pub async fn delete(&self, id: Id) -> Result<()> {
        self.track("Failed to delete plot", self.backend.delete_plot(id))
            .await?;
        info!(plot_id = id, "Plot deleted");
        Ok(())
    }

    pub async fn details(&self, id: Id) -> Result<Plot> {
        self.track("Failed to fetch plot details", self.backend.fetch_plot(id))
            .await
    }

    /// Validate the add-plot form and create the plot
    pub async fn submit_new(&self, form: &PlotForm) -> Result<Plot> {
        let body = form.validate()?;
        self.create(&body).await
    }
}

// ============================================================================
// Plot list
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotsListState {
    pub plots: Vec<Plot>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PlotsListState {
    /// Plots whose name contains `search`, ignoring case
    pub fn search(&self, search: &str) -> Vec<&Plot> {
        let needle = search.trim().to_lowercase();
        self.plots
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }
}

pub struct PlotsList {
    backend: Arc<dyn FarmBackend>,
    state: RwLock<PlotsListState>,
    scope: ViewScope,
}

impl PlotsList {
    pub fn new(backend: Arc<dyn FarmBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(PlotsListState::default()),
            scope: ViewScope::new(),
        }
    }

    pub async fn state(&self) -> PlotsListState {
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

        let query = PlotQuery::default();
        let Some(result) = self.scope.run(self.backend.fetch_plots(&query)).await else {
            return;
        };

        let mut state = self.state.write().await;
        if !self.scope.is_current(ticket) {
            return;
        }
        match result {
            Ok(page) => state.plots = page.plots,
            Err(e) => {
                error!(error = %e, "Error fetching plots");
                state.plots.clear();
                state.error = Some(e.user_message());
            }
        }
        state.loading = false;
    }
}

// ============================================================================
// Plot editor
// ============================================================================

/// Everything the edit screen needs, fetched together
#[derive(Debug, Clone, PartialEq)]
pub struct EditorData {
    pub plot: Plot,
    pub form: PlotForm,
    pub caretakers: Vec<Caretaker>,
    pub crops: Vec<Crop>,
}

impl EditorData {
    /// Crops grouped for the selector
    pub fn crop_groups(
        &self,
        catalog: &CropCatalog,
    ) -> std::collections::BTreeMap<farm_client::CropCategory, Vec<Crop>> {
        catalog.group(&self.crops)
    }
}

pub struct PlotEditor {
    backend: Arc<dyn FarmBackend>,
    plot_id: Id,
    scope: ViewScope,
}

impl PlotEditor {
    pub fn new(backend: Arc<dyn FarmBackend>, plot_id: Id) -> Self {
        Self {
            backend,
            plot_id,
            scope: ViewScope::new(),
        }
    }

    pub fn close(&self) {
        self.scope.close();
    }

    /// Load plot, caretakers and crops concurrently and prefill the form
    pub async fn prefill(&self) -> Result<EditorData> {
        let fetched = self
            .scope
            .run(async {
                tokio::try_join!(
                    self.backend.fetch_plot(self.plot_id),
                    self.backend.fetch_caretakers(),
                    self.backend.fetch_crops()
                )
            })
            .await
            .ok_or(AppError::Cancelled)?;

        let (plot, caretakers, crops) = fetched.map_err(|e| {
            error!(plot_id = self.plot_id, error = %e, "Error loading plot editor");
            AppError::from(e)
        })?;

        Ok(EditorData {
            form: PlotForm::from_plot(&plot),
            plot,
            caretakers,
            crops,
        })
    }

    /// Validate and save the edited form
    pub async fn save(&self, form: &PlotForm) -> Result<Plot> {
        let body = form.validate()?;
        self.scope
            .run(self.backend.update_plot(self.plot_id, &body))
            .await
            .ok_or(AppError::Cancelled)?
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::fixtures;
    use farm_client::PlotStatus;
    use std::time::Duration;

    #[tokio::test]
    async fn test_submit_new_round_trip() {
        let backend = Arc::new(fixtures::demo_backend());
        let manager = PlotManager::new(backend.clone());

        let form = PlotForm {
            name: "River Bend".into(),
            acreage: "4.75".into(),
            caretaker_id: "2".into(),
            current_crop_id: "1".into(),
            ..Default::default()
        };
        let created = manager.submit_new(&form).await.unwrap();
        let fetched = manager.details(created.id).await.unwrap();

        assert_eq!(fetched.name, "River Bend");
        assert_eq!(fetched.acreage, 4.75);
        assert_eq!(fetched.caretaker_name(), Some("Maria Garcia"));
        assert_eq!(fetched.status, PlotStatus::Planting);
        assert_eq!(manager.state().await, ManagerState::default());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_backend() {
        let backend = Arc::new(MockBackend::new());
        let manager = PlotManager::new(backend.clone());

        let err = manager.submit_new(&PlotForm::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(backend.call_count("create_plot"), 0);
    }

    #[tokio::test]
    async fn test_manager_records_error() {
        let backend = Arc::new(MockBackend::new());
        let manager = PlotManager::new(backend);

        assert!(manager.delete(42).await.is_err());
        let state = manager.state().await;
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Plot not found"));
    }

    #[tokio::test]
    async fn test_closed_manager_leaves_state_alone() {
        let backend = Arc::new(MockBackend::new());
        backend.queue_delay("delete_plot", Duration::from_millis(200));
        let manager = Arc::new(PlotManager::new(backend));

        let handle = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.delete(42).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        manager.close();

        assert!(matches!(handle.await.unwrap(), Err(AppError::Cancelled)));
        assert_eq!(manager.state().await.error, None);
        assert!(matches!(manager.details(1).await, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_submitted_name_is_kept_verbatim() {
        let manager = PlotManager::new(Arc::new(fixtures::demo_backend()));
        let form = PlotForm {
            name: " River Bend ".into(),
            acreage: "4.75".into(),
            caretaker_id: "2".into(),
            ..Default::default()
        };

        let created = manager.submit_new(&form).await.unwrap();
        let fetched = manager.details(created.id).await.unwrap();
        assert_eq!(fetched.name, " River Bend ");
    }

    #[test]
    fn test_rejected_without_message_uses_default() {
        let err = FarmError::Rejected(String::new());
        assert_eq!(failure_message(&err, "Failed to create plot"), "Failed to create plot");
        let err = FarmError::Rejected("Duplicate name".into());
        assert_eq!(failure_message(&err, "Failed to create plot"), "Duplicate name");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let list = PlotsList::new(Arc::new(fixtures::demo_backend()));
        list.load().await;
        let state = list.state().await;

        let names: Vec<&str> = state.search("FIELD c").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["East Field C"]);
        assert_eq!(state.search("").len(), 4);
    }

    #[tokio::test]
    async fn test_editor_prefill_and_save() {
        let backend = Arc::new(fixtures::demo_backend());
        let editor = PlotEditor::new(backend.clone(), 3);

        let data = editor.prefill().await.unwrap();
        assert_eq!(data.form.name, "East Field C");
        assert_eq!(data.form.caretaker_id, "3");
        assert_eq!(data.caretakers.len(), 3);
        assert!(!data.crop_groups(&CropCatalog::new()).is_empty());

        let mut form = data.form.clone();
        form.acreage = "6".into();
        let saved = editor.save(&form).await.unwrap();
        assert_eq!(saved.acreage, 6.0);
        assert_eq!(backend.plots()[2].acreage, 6.0);
    }

    #[tokio::test]
    async fn test_closed_editor_is_cancelled() {
        let editor = PlotEditor::new(Arc::new(fixtures::demo_backend()), 1);
        editor.close();
        assert!(matches!(editor.prefill().await, Err(AppError::Cancelled)));
    }
}
