//! In-memory farm backend for testing.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use farm_client::dates::parse_timestamp;
use farm_client::*;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::traits::FarmBackend;

/// Mock backend for testing.
///
/// Holds records in memory, counts calls per operation and can be told to
/// fail or stall individual operations. Plot listings ignore the `status`
/// filter so that callers' own filtering is observable.
#[derive(Default)]
pub struct MockBackend {
    plots: Mutex<Vec<Plot>>,
    weather: Mutex<Weather>,
    crops: Mutex<Vec<Crop>>,
    caretakers: Mutex<Vec<Caretaker>>,
    lifecycles: Mutex<Vec<LifecycleEvent>>,
    fertilizers: Mutex<Vec<FertilizerRecord>>,
    pesticides: Mutex<Vec<PesticideRecord>>,
    irrigations: Mutex<Vec<IrrigationRecord>>,
    expenses: Mutex<Vec<ExpenseRecord>>,
    reminders: Mutex<Vec<Reminder>>,
    page_size: Option<u32>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<&'static str, VecDeque<Duration>>>,
    calls: Mutex<HashMap<&'static str, u32>>,
    next_id: AtomicI64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockBackend {
    /// Create an empty mock backend.
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            ..Default::default()
        }
    }

    /// Seed plots, in server order.
    pub fn with_plots(self, plots: Vec<Plot>) -> Self {
        *lock(&self.plots) = plots;
        self
    }

    pub fn with_weather(self, weather: Weather) -> Self {
        *lock(&self.weather) = weather;
        self
    }

    pub fn with_crops(self, crops: Vec<Crop>) -> Self {
        *lock(&self.crops) = crops;
        self
    }

    pub fn with_caretakers(self, caretakers: Vec<Caretaker>) -> Self {
        *lock(&self.caretakers) = caretakers;
        self
    }

    pub fn with_lifecycles(self, events: Vec<LifecycleEvent>) -> Self {
        *lock(&self.lifecycles) = events;
        self
    }

    pub fn with_fertilizers(self, records: Vec<FertilizerRecord>) -> Self {
        *lock(&self.fertilizers) = records;
        self
    }

    pub fn with_reminders(self, reminders: Vec<Reminder>) -> Self {
        *lock(&self.reminders) = reminders;
        self
    }

    /// Paginate plot listings that do not specify a limit.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Make an operation fail with a 500 until cleared.
    pub fn with_failure(self, operation: &'static str) -> Self {
        self.set_failure(operation, true);
        self
    }

    pub fn set_failure(&self, operation: &'static str, failing: bool) {
        let mut set = lock(&self.failing);
        if failing {
            set.insert(operation);
        } else {
            set.remove(operation);
        }
    }

    /// Delay the next call of an operation. Queued delays are used in order.
    pub fn queue_delay(&self, operation: &'static str, delay: Duration) {
        lock(&self.delays)
            .entry(operation)
            .or_default()
            .push_back(delay);
    }

    /// Number of times an operation was called.
    pub fn call_count(&self, operation: &str) -> u32 {
        lock(&self.calls).get(operation).copied().unwrap_or(0)
    }

    /// Snapshot of the stored plots.
    pub fn plots(&self) -> Vec<Plot> {
        lock(&self.plots).clone()
    }

    /// Snapshot of the stored reminders.
    pub fn reminders(&self) -> Vec<Reminder> {
        lock(&self.reminders).clone()
    }

    async fn enter(&self, operation: &'static str) -> Result<()> {
        *lock(&self.calls).entry(operation).or_insert(0) += 1;

        let delay = lock(&self.delays)
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if lock(&self.failing).contains(operation) {
            return Err(FarmError::Server {
                status: 500,
                message: format!("{} unavailable", operation),
            });
        }
        Ok(())
    }

    fn plot_from(&self, id: Id, plot: &NewPlot) -> Plot {
        let caretaker = plot.caretaker_id.and_then(|cid| {
            lock(&self.caretakers)
                .iter()
                .find(|c| c.id == cid)
                .map(|c| CaretakerRef::Record {
                    id: Some(c.id),
                    name: c.name.clone(),
                })
        });
        let current_crop = plot.current_crop_id.and_then(|cid| {
            lock(&self.crops)
                .iter()
                .find(|c| c.id == cid)
                .map(|c| CropRef::Record {
                    id: Some(c.id),
                    name: c.name.clone(),
                })
        });

        Plot {
            id,
            name: plot.name.clone(),
            acreage: plot.acreage,
            location: plot.location.clone(),
            status: plot.status.clone(),
            caretaker,
            caretaker_id: plot.caretaker_id,
            current_crop,
            current_crop_id: plot.current_crop_id,
            planted_date: plot.planted_date.clone(),
            expected_harvest_date: plot.expected_harvest_date.clone(),
            notes: plot.notes.clone(),
            last_activity: None,
        }
    }
}

fn by_plot<T: Clone>(records: &Mutex<Vec<T>>, plot_id: Id, key: impl Fn(&T) -> Id) -> Vec<T> {
    lock(records)
        .iter()
        .filter(|r| key(r) == plot_id)
        .cloned()
        .collect()
}

#[async_trait]
impl FarmBackend for MockBackend {
    async fn fetch_plots(&self, query: &PlotQuery) -> Result<PlotPage> {
        self.enter("fetch_plots").await?;
        let all = lock(&self.plots).clone();

        let Some(limit) = query.limit.or(self.page_size) else {
            let total = all.len();
            return Ok(PlotPage {
                plots: all,
                pagination: Pagination {
                    page: 1,
                    limit: total as u32,
                    total: total as u64,
                    total_pages: 1,
                },
            });
        };

        let page = query.page.unwrap_or(1).max(1);
        let total = all.len();
        let total_pages = ((total as u32 + limit - 1) / limit).max(1);
        let plots = all
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();

        Ok(PlotPage {
            plots,
            pagination: Pagination {
                page,
                limit,
                total: total as u64,
                total_pages,
            },
        })
    }

    async fn fetch_plot(&self, id: Id) -> Result<Plot> {
        self.enter("fetch_plot").await?;
        lock(&self.plots)
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| FarmError::NotFound("Plot".into()))
    }

    async fn create_plot(&self, plot: &NewPlot) -> Result<Plot> {
        self.enter("create_plot").await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = self.plot_from(id, plot);
        lock(&self.plots).push(created.clone());
        Ok(created)
    }

    async fn update_plot(&self, id: Id, plot: &NewPlot) -> Result<Plot> {
        self.enter("update_plot").await?;
        let updated = self.plot_from(id, plot);
        let mut plots = lock(&self.plots);
        let slot = plots
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| FarmError::NotFound("Plot".into()))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_plot(&self, id: Id) -> Result<()> {
        self.enter("delete_plot").await?;
        let mut plots = lock(&self.plots);
        let before = plots.len();
        plots.retain(|p| p.id != id);
        if plots.len() == before {
            return Err(FarmError::NotFound("Plot".into()));
        }
        Ok(())
    }

    async fn fetch_weather(&self) -> Result<Weather> {
        self.enter("fetch_weather").await?;
        Ok(lock(&self.weather).clone())
    }

    async fn fetch_crops(&self) -> Result<Vec<Crop>> {
        self.enter("fetch_crops").await?;
        Ok(lock(&self.crops).clone())
    }

    async fn fetch_caretakers(&self) -> Result<Vec<Caretaker>> {
        self.enter("fetch_caretakers").await?;
        Ok(lock(&self.caretakers).clone())
    }

    async fn fetch_lifecycles_by_plot(&self, plot_id: Id) -> Result<Vec<LifecycleEvent>> {
        self.enter("fetch_lifecycles_by_plot").await?;
        Ok(by_plot(&self.lifecycles, plot_id, |e| e.plot_id))
    }

    async fn fetch_fertilizers_by_plot(&self, plot_id: Id) -> Result<Vec<FertilizerRecord>> {
        self.enter("fetch_fertilizers_by_plot").await?;
        Ok(by_plot(&self.fertilizers, plot_id, |r| r.plot_id))
    }

    async fn fetch_pesticides_by_plot(&self, plot_id: Id) -> Result<Vec<PesticideRecord>> {
        self.enter("fetch_pesticides_by_plot").await?;
        Ok(by_plot(&self.pesticides, plot_id, |r| r.plot_id))
    }

    async fn fetch_irrigations_by_plot(&self, plot_id: Id) -> Result<Vec<IrrigationRecord>> {
        self.enter("fetch_irrigations_by_plot").await?;
        Ok(by_plot(&self.irrigations, plot_id, |r| r.plot_id))
    }

    async fn fetch_expenses_by_plot(&self, plot_id: Id) -> Result<Vec<ExpenseRecord>> {
        self.enter("fetch_expenses_by_plot").await?;
        Ok(by_plot(&self.expenses, plot_id, |r| r.plot_id))
    }

    async fn fetch_reminders(&self, reminder_type: Option<&ReminderType>) -> Result<Vec<Reminder>> {
        self.enter("fetch_reminders").await?;
        Ok(lock(&self.reminders)
            .iter()
            .filter(|r| reminder_type.map_or(true, |t| &r.reminder_type == t))
            .cloned()
            .collect())
    }

    async fn fetch_upcoming_reminders(&self, days: u32) -> Result<Vec<Reminder>> {
        self.enter("fetch_upcoming_reminders").await?;
        let horizon = Utc::now() + ChronoDuration::days(i64::from(days));
        Ok(lock(&self.reminders)
            .iter()
            .filter(|r| !r.sent)
            .filter(|r| parse_timestamp(&r.due_date).map_or(false, |due| due <= horizon))
            .cloned()
            .collect())
    }

    async fn mark_reminder_done(&self, id: Id) -> Result<()> {
        self.enter("mark_reminder_done").await?;
        let mut reminders = lock(&self.reminders);
        let reminder = reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| FarmError::NotFound("Reminder".into()))?;
        reminder.sent = true;
        Ok(())
    }
}
