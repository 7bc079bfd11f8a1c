//! Schedule screen: open reminders, soonest first

use chrono::{DateTime, Utc};
use farm_client::dates::parse_timestamp;
use farm_client::{Id, Reminder, ReminderType};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::backend::FarmBackend;
use crate::derived::{priority, Priority};
use crate::error::{AppError, Result};
use crate::scope::ViewScope;

/// Sort ascending by due date; unparseable dates go last in input order
pub fn sort_by_due(reminders: &mut [Reminder]) {
    reminders.sort_by_key(|r| match parse_timestamp(&r.due_date) {
        Some(due) => (0, Some(due)),
        None => (1, None),
    });
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemindersState {
    pub reminders: Vec<Reminder>,
    pub filter: Option<ReminderType>,
    pub loading: bool,
    pub error: Option<String>,
}

impl RemindersState {
    /// Each reminder with its current priority
    pub fn prioritized(&self, now: DateTime<Utc>) -> Vec<(&Reminder, Priority)> {
        self.reminders
            .iter()
            .map(|r| (r, priority(r, now)))
            .collect()
    }
}

pub struct RemindersView {
    backend: Arc<dyn FarmBackend>,
    state: RwLock<RemindersState>,
    scope: ViewScope,
}

impl RemindersView {
    pub fn new(backend: Arc<dyn FarmBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(RemindersState::default()),
            scope: ViewScope::new(),
        }
    }

    pub async fn state(&self) -> RemindersState {
        self.state.read().await.clone()
    }

    pub fn close(&self) {
        self.scope.close();
    }

    /// Load reminders, optionally of one type only
    pub async fn load(&self, filter: Option<ReminderType>) {
        let ticket = self.scope.begin();
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
            state.filter = filter.clone();
        }

        let Some(result) = self
            .scope
            .run(self.backend.fetch_reminders(filter.as_ref()))
            .await
        else {
            return;
        };

        let mut state = self.state.write().await;
        if !self.scope.is_current(ticket) {
            return;
        }
        match result {
            Ok(mut reminders) => {
                sort_by_due(&mut reminders);
                state.reminders = reminders;
            }
            Err(e) => {
                error!(error = %e, "Error fetching reminders");
                state.reminders.clear();
                state.error = Some(e.user_message());
            }
        }
        state.loading = false;
    }

    /// Mark a reminder done and drop it from the list once the server agrees
    pub async fn mark_done(&self, id: Id) -> Result<()> {
        let result = self
            .scope
            .run(self.backend.mark_reminder_done(id))
            .await
            .ok_or(AppError::Cancelled)?;

        let mut state = self.state.write().await;
        if self.scope.is_closed() {
            return Err(AppError::Cancelled);
        }
        if let Err(e) = result {
            error!(reminder_id = id, error = %e, "Error marking reminder as done");
            state.error = Some(e.user_message());
            return Err(e.into());
        }

        info!(reminder_id = id, "Reminder marked as done");
        state.reminders.retain(|r| r.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::fixtures;
    use std::time::Duration;

    #[test]
    fn test_sort_by_due() {
        let mut reminders = vec![
            fixtures::reminder(1, 1, "2024-06-10"),
            fixtures::reminder(2, 1, "soon"),
            fixtures::reminder(3, 1, "2024-06-01T08:00:00Z"),
            fixtures::reminder(4, 1, "2024-06-05"),
        ];
        sort_by_due(&mut reminders);
        let ids: Vec<Id> = reminders.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    #[tokio::test]
    async fn test_load_sorted_with_priorities() {
        let view = RemindersView::new(Arc::new(fixtures::demo_backend()));
        let now = Utc::now();
        view.load(None).await;
        let state = view.state().await;

        let ids: Vec<Id> = state.reminders.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4, 2, 3]);

        let priorities: Vec<Priority> = state.prioritized(now).iter().map(|(_, p)| *p).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::Medium, Priority::Medium, Priority::Low]
        );
    }

    #[tokio::test]
    async fn test_type_filter() {
        let view = RemindersView::new(Arc::new(fixtures::demo_backend()));
        view.load(Some(ReminderType::Harvest)).await;
        let state = view.state().await;

        assert_eq!(state.reminders.len(), 1);
        assert_eq!(state.reminders[0].id, 2);
        assert_eq!(state.filter, Some(ReminderType::Harvest));
    }

    #[tokio::test]
    async fn test_mark_done_removes_locally() {
        let backend = Arc::new(fixtures::demo_backend());
        let view = RemindersView::new(backend.clone());
        view.load(None).await;

        view.mark_done(4).await.unwrap();
        let state = view.state().await;
        assert_eq!(state.reminders.len(), 3);
        assert!(state.reminders.iter().all(|r| r.id != 4));
        assert!(backend.reminders().iter().any(|r| r.id == 4 && r.sent));
    }

    #[tokio::test]
    async fn test_failed_mark_done_keeps_reminder() {
        let backend = Arc::new(fixtures::demo_backend().with_failure("mark_reminder_done"));
        let view = RemindersView::new(backend);
        view.load(None).await;

        assert!(view.mark_done(1).await.is_err());
        let state = view.state().await;
        assert_eq!(state.reminders.len(), 4);
        assert_eq!(state.error.as_deref(), Some("mark_reminder_done unavailable"));
    }

    #[tokio::test]
    async fn test_mark_done_after_close_keeps_list() {
        let backend = Arc::new(fixtures::demo_backend());
        let view = Arc::new(RemindersView::new(backend.clone()));
        view.load(None).await;
        backend.queue_delay("mark_reminder_done", Duration::from_millis(200));

        let handle = {
            let view = view.clone();
            tokio::spawn(async move { view.mark_done(1).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        view.close();

        assert!(matches!(handle.await.unwrap(), Err(AppError::Cancelled)));
        let state = view.state().await;
        assert_eq!(state.reminders.len(), 4);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_failed_load() {
        let view = RemindersView::new(Arc::new(MockBackend::new().with_failure("fetch_reminders")));
        view.load(None).await;
        let state = view.state().await;
        assert!(state.reminders.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_some());
    }
}
