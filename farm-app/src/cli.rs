//! Command execution for the `farm` binary
//!
//! Each command is checked by the route guard, run through the matching
//! view model and rendered as plain text.

use chrono::{DateTime, Utc};
use farm_client::{FarmClient, FarmError, LoginRequest, ReportQuery, SignupRequest};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

use crate::backend::FarmBackend;
use crate::config::{reminder_filter, status_query, Command};
use crate::derived::{crop_label, sort_plots, CropCatalog};
use crate::error::{AppError, Result};
use crate::fixtures;
use crate::forms::{LoginForm, SignupForm};
use crate::router::{guard, Navigation, Route};
use crate::views::{
    Dashboard, DashboardState, DetailTab, PlotDetails, PlotManager, PlotsList, RemindersView,
    TabData, Timeline, UpcomingTask,
};

/// Where commands get their data
pub struct App {
    backend: Arc<dyn FarmBackend>,
    /// Absent in demo mode
    client: Option<FarmClient>,
}

impl App {
    /// Talk to the REST API through `client`
    pub fn remote(client: FarmClient) -> Self {
        Self {
            backend: Arc::new(client.clone()),
            client: Some(client),
        }
    }

    /// Serve sample data from memory; always signed in
    pub fn demo() -> Self {
        Self::with_backend(Arc::new(fixtures::demo_backend()))
    }

    pub fn with_backend(backend: Arc<dyn FarmBackend>) -> Self {
        Self {
            backend,
            client: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.client
            .as_ref()
            .map_or(true, |c| c.session().is_authenticated())
    }

    fn client(&self) -> Result<&FarmClient> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Config("Not available in demo mode".to_string()))
    }
}

/// Run one command and return its printable output
pub async fn execute(app: &App, command: Command, now: DateTime<Utc>) -> Result<String> {
    let authenticated = app.is_authenticated();

    match command.route() {
        Some(route) if !matches!(command, Command::Route { .. }) => {
            if let Navigation::Redirect(target) = guard(route, authenticated) {
                return Err(AppError::Redirected(target));
            }
        }
        _ => {}
    }

    match command {
        Command::Login { email, password } => {
            let request: LoginRequest = LoginForm { email, password }.validate()?;
            let payload = app.client()?.login(&request).await?;
            Ok(match payload.user {
                Some(user) => format!("Signed in as {} <{}>", user.name, user.email),
                None => "Signed in".to_string(),
            })
        }

        Command::Signup {
            name,
            email,
            password,
        } => {
            let request: SignupRequest = SignupForm {
                name,
                email,
                password,
            }
            .validate()?;
            app.client()?.signup(&request).await?;
            Ok(format!("Account created for {}", request.email))
        }

        Command::Logout => {
            app.client()?.logout()?;
            Ok("Signed out".to_string())
        }

        Command::Whoami => {
            let user = app.client()?.me().await?;
            Ok(format!("{} <{}>", user.name, user.email))
        }

        Command::Dashboard { status, pages } => {
            let dashboard = Dashboard::new(app.backend.clone());
            let criteria = status_query(status.as_deref());
            if criteria.status.is_some() {
                dashboard.filter_plots(criteria).await;
                // Weather comes with the full load only
                dashboard.refresh().await;
            } else {
                dashboard.load().await;
            }
            for _ in 1..pages {
                dashboard.load_more_plots().await;
            }
            let state = dashboard.state().await;
            match state.error {
                Some(error) => Err(AppError::Load(error)),
                None => Ok(format_dashboard(&state, now)),
            }
        }

        Command::Plots { search, sort, desc } => {
            let list = PlotsList::new(app.backend.clone());
            list.load().await;
            let state = list.state().await;
            if let Some(error) = state.error {
                return Err(AppError::Load(error));
            }

            let mut plots: Vec<_> = state
                .search(search.as_deref().unwrap_or_default())
                .into_iter()
                .cloned()
                .collect();
            let order = if desc {
                farm_client::SortOrder::Desc
            } else {
                farm_client::SortOrder::Asc
            };
            sort_plots(&mut plots, sort, order);

            if plots.is_empty() {
                return Ok("No plots found".to_string());
            }
            Ok(plots
                .iter()
                .map(|p| {
                    format!(
                        "#{} {} - {} acres, {}",
                        p.id,
                        p.name,
                        p.acreage,
                        p.status
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }

        Command::Plot { id, tab } => {
            let details = PlotDetails::new(app.backend.clone(), id);
            details.load().await;
            let state = details.state().await;
            let plot = match (state.plot, state.error) {
                (Some(plot), _) => plot,
                (None, error) => {
                    return Err(AppError::Load(
                        error.unwrap_or_else(|| "Plot not found".to_string()),
                    ))
                }
            };
            let upcoming = details.load_upcoming(now).await?;

            let mut out = String::new();
            let _ = writeln!(out, "{} (#{})", plot.name, plot.id);
            let _ = writeln!(out, "  Acreage:   {}", plot.acreage);
            let _ = writeln!(out, "  Status:    {}", plot.status);
            let _ = writeln!(out, "  Crop:      {}", plot.crop_name().unwrap_or("-"));
            let _ = writeln!(out, "  Caretaker: {}", plot.caretaker_name().unwrap_or("-"));
            let _ = writeln!(out, "  Next task: {}", crate::derived::next_task(&plot, now));
            out.push_str(&format_upcoming(&upcoming));
            let counts: Vec<String> = details
                .tab_counts()
                .await
                .into_iter()
                .map(|(tab, count)| match count {
                    Some(n) => format!("{:?} {}", tab, n),
                    None => format!("{:?} ?", tab),
                })
                .collect();
            let _ = writeln!(out, "  Records: {}", counts.join(", "));
            if let Some(tab) = tab {
                out.push_str(&format_tab(tab, &details.open_tab(tab).await?));
            }
            Ok(out.trim_end().to_string())
        }

        Command::Timeline { id } => {
            let timeline = PlotDetails::new(app.backend.clone(), id).timeline().await?;
            Ok(format_timeline(&timeline))
        }

        Command::AddPlot(add) => {
            let manager = PlotManager::new(app.backend.clone());
            let plot = manager.submit_new(&add.to_form()).await?;
            info!(plot_id = plot.id, "Added plot");

            // Only used for the confirmation line
            let crops = app.backend.fetch_crops().await.unwrap_or_default();
            let catalog = CropCatalog::new();

            let crop = plot
                .current_crop_id
                .and_then(|id| crops.iter().find(|c| c.id == id))
                .map(|c| format!(", {} ({})", crop_label(c), catalog.category_of(c).label()))
                .unwrap_or_default();
            Ok(format!("Created plot #{} {}{}", plot.id, plot.name, crop))
        }

        Command::Reminders { reminder_type } => {
            let view = RemindersView::new(app.backend.clone());
            view.load(reminder_filter(reminder_type.as_deref())).await;
            let state = view.state().await;
            if let Some(error) = state.error.clone() {
                return Err(AppError::Load(error));
            }
            if state.reminders.is_empty() {
                return Ok("No reminders".to_string());
            }
            Ok(state
                .prioritized(now)
                .iter()
                .map(|(r, priority)| {
                    format!(
                        "[{:<6}] #{} {} - plot {} due {}{}",
                        priority.as_str(),
                        r.id,
                        r.reminder_type.title(),
                        r.plot_id,
                        r.due_date,
                        r.message
                            .as_deref()
                            .map(|m| format!(" ({})", m))
                            .unwrap_or_default()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }

        Command::Done { id } => {
            let view = RemindersView::new(app.backend.clone());
            view.mark_done(id).await?;
            Ok(format!("Reminder #{} marked as done", id))
        }

        Command::Reports { timeframe, plot } => {
            let query = ReportQuery {
                timeframe,
                plot_id: plot,
            };
            let report = app.client()?.fetch_reports_dashboard(&query).await?;
            Ok(serde_json::to_string_pretty(&report).map_err(FarmError::from)?)
        }

        Command::Route { path } => {
            let route = Route::parse(&path)
                .ok_or_else(|| AppError::Config(format!("Unknown route '{}'", path)))?;
            Ok(format_navigation(route, guard(route, authenticated)))
        }
    }
}

fn format_navigation(route: Route, navigation: Navigation) -> String {
    match navigation {
        Navigation::Allow(_) => format!("{} -> {}", route, route),
        Navigation::Redirect(target) => format!("{} -> {} (redirect)", route, target),
    }
}

fn format_dashboard(state: &DashboardState, now: DateTime<Utc>) -> String {
    let summary = state.summary();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Total acres: {}   Active plots: {}",
        summary.total_acres, summary.active_plots
    );
    if let (Some(temperature), Some(rain)) = (&summary.temperature, &summary.expected_rain) {
        let status = state
            .weather
            .as_ref()
            .and_then(|w| w.status.as_deref())
            .unwrap_or("");
        let _ = writeln!(out, "Weather: {}, {} rain expected  {}", temperature, rain, status);
    }
    let _ = writeln!(out);

    for card in state.cards(now) {
        let _ = writeln!(
            out,
            "#{} {} [{}] {} acres - {}, {}",
            card.id, card.name, card.status, card.acreage, card.crop, card.caretaker
        );
        let _ = writeln!(
            out,
            "    {} {}  ({})",
            card.urgency.marker(),
            card.next_task,
            card.last_activity
        );
    }

    if state.pagination.has_more() {
        let _ = writeln!(
            out,
            "Page {} of {}",
            state.pagination.page, state.pagination.total_pages
        );
    }
    out.trim_end().to_string()
}

fn format_upcoming(upcoming: &[UpcomingTask]) -> String {
    if upcoming.is_empty() {
        return "  No upcoming tasks\n".to_string();
    }
    let mut out = String::from("  Upcoming tasks:\n");
    for task in upcoming {
        let _ = writeln!(
            out,
            "    [{}] {} due {}",
            task.priority,
            task.reminder.reminder_type.title(),
            task.reminder.due_date
        );
    }
    out
}

fn format_tab(tab: DetailTab, data: &TabData) -> String {
    let mut out = format!("  {:?}:\n", tab);
    if data.is_empty() {
        out.push_str("    (none)\n");
        return out;
    }

    let dash = |d: &Option<String>| d.clone().unwrap_or_else(|| "-".to_string());
    let lines: Vec<String> = match data {
        TabData::Lifecycle(events) => events
            .iter()
            .map(|e| format!("{} {} - {}", dash(&e.date), e.event_type.label_en(), e.title))
            .collect(),
        TabData::Fertilizer(records) => records
            .iter()
            .map(|r| {
                format!(
                    "{} {} x{} cost {}",
                    dash(&r.date),
                    dash(&r.fertilizer_type),
                    r.quantity,
                    r.cost
                )
            })
            .collect(),
        TabData::Pesticide(records) => records
            .iter()
            .map(|r| {
                format!(
                    "{} {} x{} cost {}",
                    dash(&r.date),
                    dash(&r.pesticide_type),
                    r.quantity,
                    r.cost
                )
            })
            .collect(),
        TabData::Irrigation(records) => records
            .iter()
            .map(|r| {
                format!(
                    "{} {} {} for {}",
                    dash(&r.date),
                    dash(&r.method),
                    dash(&r.quantity),
                    dash(&r.duration)
                )
            })
            .collect(),
        TabData::Expenses(records) => records
            .iter()
            .map(|r| {
                format!(
                    "{} {} {} - {}",
                    dash(&r.date),
                    r.category,
                    r.amount,
                    dash(&r.description)
                )
            })
            .collect(),
    };
    for line in lines {
        let _ = writeln!(out, "    {}", line);
    }
    out
}

fn format_timeline(timeline: &Timeline) -> String {
    let mut out = format!("{} timeline\n", timeline.plot.name);
    if timeline.events.is_empty() {
        out.push_str("  No events recorded");
        return out;
    }
    for event in &timeline.events {
        let _ = writeln!(
            out,
            "  {}  {}  {}",
            event.date.as_deref().unwrap_or("undated"),
            event.event_type.option_label(),
            event.title
        );
    }
    out.trim_end().to_string()
}
