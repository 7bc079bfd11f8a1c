//! Display values for dashboard cards and plot listings

use chrono::{DateTime, Utc};
use farm_client::dates::parse_timestamp;
use farm_client::{Plot, PlotStatus, SortOrder, Weather};
use serde::Serialize;
use std::cmp::Ordering;

use super::next_task::days_since_planted;
use super::DAY_MS;

/// Figures shown on the dashboard summary cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Sum of acreage, one decimal place
    pub total_acres: String,
    pub active_plots: usize,
    pub temperature: Option<String>,
    pub expected_rain: Option<String>,
}

impl DashboardSummary {
    pub fn compute(plots: &[Plot], weather: Option<&Weather>) -> Self {
        let total = plots.iter().fold(0.0, |sum, p| sum + p.acreage);
        Self {
            total_acres: format!("{:.1}", total),
            active_plots: plots.len(),
            temperature: weather.map(|w| format_temperature(w.temperature)),
            expected_rain: weather.map(|w| format_rain(w.expected_rain)),
        }
    }
}

/// `24` → `"24°C"`; integral values print without a fraction
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", trim_number(celsius))
}

pub fn format_rain(mm: f64) -> String {
    format!("{}mm", trim_number(mm))
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Badge text for a plot status
pub fn status_label(status: &PlotStatus) -> &'static str {
    match status {
        PlotStatus::Planting => "Planted!",
        PlotStatus::Growing => "Growing",
        PlotStatus::Harvested | PlotStatus::Ready => "Ready!",
        PlotStatus::Fallow => "Fallow",
        PlotStatus::Other(_) => "Growing",
    }
}

/// Urgency marker inferred from task wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskUrgency {
    High,
    Medium,
    Low,
    None,
}

impl TaskUrgency {
    pub fn marker(&self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
            Self::None => "",
        }
    }
}

pub fn task_urgency(task: &str) -> TaskUrgency {
    let task = task.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| task.contains(w));

    if has(&["daily", "urgent"]) {
        TaskUrgency::High
    } else if has(&["weekly", "check"]) {
        TaskUrgency::Medium
    } else if has(&["monitor", "prepare"]) {
        TaskUrgency::Low
    } else {
        TaskUrgency::None
    }
}

/// "Today", "Yesterday", "N days ago", else days growing since planting
pub fn last_activity_text(plot: &Plot, now: DateTime<Utc>) -> String {
    if let Some(last) = plot.last_activity.as_deref().and_then(parse_timestamp) {
        let days = (now - last).num_milliseconds().div_euclid(DAY_MS);
        return match days {
            ..=0 => "Today".to_string(),
            1 => "Yesterday".to_string(),
            n => format!("{} days ago", n),
        };
    }

    match days_since_planted(plot, now) {
        0 => "No recent activity".to_string(),
        days => format!("{} days growing", days),
    }
}

/// Sort key for plot listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotSortKey {
    #[default]
    Name,
    Acreage,
    Status,
}

impl std::str::FromStr for PlotSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "acres" | "acreage" => Ok(Self::Acreage),
            "status" => Ok(Self::Status),
            other => Err(format!("cannot sort by '{}'", other)),
        }
    }
}

/// Stable in-place sort
pub fn sort_plots(plots: &mut [Plot], key: PlotSortKey, order: SortOrder) {
    plots.sort_by(|a, b| {
        let ordering = match key {
            PlotSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            PlotSortKey::Acreage => a.acreage.partial_cmp(&b.acreage).unwrap_or(Ordering::Equal),
            PlotSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
