//! Configuration for the `farm` command line
//!
//! CLI arguments and environment variable handling using clap. A `.env`
//! file in the working directory is loaded before parsing.

use clap::{Parser, Subcommand};
use farm_client::config::DEFAULT_API_BASE;
use farm_client::{ClientConfig, PlotQuery, PlotStatus, ReminderType, Timeframe};
use std::path::PathBuf;

use crate::derived::PlotSortKey;
use crate::forms::PlotForm;
use crate::router::Route;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// farm - command line client for the farm management API
#[derive(Parser, Debug, Clone)]
#[command(name = "farm")]
#[command(about = "Manage plots, activities and reminders from the terminal")]
pub struct Args {
    /// Base URL of the farm REST API
    #[arg(long, env = "FARM_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// File holding the session token between runs
    #[arg(long, env = "FARM_TOKEN_FILE", default_value = ".farm-session")]
    pub token_file: PathBuf,

    /// Request timeout in seconds
    #[arg(long, env = "FARM_REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Serve sample data from memory instead of calling the API
    #[arg(long, env = "FARM_DEMO", default_value = "false")]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FARM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and store the session token
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FARM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Weather, summary and plot cards
    Dashboard {
        /// Only show plots with this status
        #[arg(long)]
        status: Option<String>,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// List plots
    Plots {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
        /// name, acreage or status
        #[arg(long, default_value = "name")]
        sort: PlotSortKey,
        #[arg(long)]
        desc: bool,
    },

    /// Show one plot with its upcoming tasks
    Plot {
        id: i64,
        /// Also list records of one tab (lifecycle, fertilizer, pesticide, irrigation, expenses)
        #[arg(long)]
        tab: Option<crate::views::DetailTab>,
    },

    /// Show a plot's lifecycle timeline
    Timeline { id: i64 },

    /// Create a plot
    AddPlot(AddPlotArgs),

    /// List reminders, soonest first
    Reminders {
        /// watering, fertilizer, spray, harvest or other
        #[arg(long = "type")]
        reminder_type: Option<String>,
    },

    /// Mark a reminder as done
    Done { id: i64 },

    /// Combined financial, yield and efficiency report
    Reports {
        #[arg(long, default_value = "month")]
        timeframe: Timeframe,
        #[arg(long)]
        plot: Option<i64>,
    },

    /// Show where a path leads for the current session
    Route { path: String },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct AddPlotArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub acreage: String,
    /// Caretaker id
    #[arg(long)]
    pub caretaker: String,
    /// Crop id
    #[arg(long, default_value = "")]
    pub crop: String,
    #[arg(long, default_value = "planting")]
    pub status: String,
    #[arg(long, default_value = "")]
    pub location: String,
    /// Planted date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub planted: String,
    /// Expected harvest date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub harvest: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl AddPlotArgs {
    pub fn to_form(&self) -> PlotForm {
        PlotForm {
            name: self.name.clone(),
            acreage: self.acreage.clone(),
            location: self.location.clone(),
            caretaker_id: self.caretaker.clone(),
            current_crop_id: self.crop.clone(),
            status: self.status.clone(),
            planted_date: self.planted.clone(),
            expected_harvest_date: self.harvest.clone(),
            notes: self.notes.clone(),
        }
    }
}

impl Command {
    /// Screen this command stands for, checked by the route guard.
    ///
    /// `None` for `route`, whose path is only known at run time and may not
    /// parse.
    pub fn route(&self) -> Option<Route> {
        Some(match self {
            Self::Login { .. } => Route::Login,
            Self::Signup { .. } => Route::Signup,
            Self::Logout | Self::Whoami => Route::Settings,
            Self::Dashboard { .. } => Route::Dashboard,
            Self::Plots { .. } => Route::Plots,
            Self::Plot { id, .. } => Route::PlotDetails(*id),
            Self::Timeline { id } => Route::Timeline(*id),
            Self::AddPlot(_) => Route::AddPlot,
            Self::Reminders { .. } | Self::Done { .. } => Route::Schedule,
            Self::Reports { .. } => Route::Reports,
            Self::Route { path } => return Route::parse(path),
        })
    }
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "LOG_LEVEL must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if self.timeout_secs == 0 {
            return Err("FARM_REQUEST_TIMEOUT_SECS must be positive".to_string());
        }

        self.client_config()
            .validated()
            .map_err(|e| e.user_message())?;

        if self.token_file.as_os_str().is_empty() {
            return Err("FARM_TOKEN_FILE must not be empty".to_string());
        }

        match &self.command {
            Command::Dashboard { pages, .. } if *pages == 0 => {
                Err("--pages must be at least 1".to_string())
            }
            Command::Route { path } if Route::parse(path).is_none() => {
                Err(format!("Unknown route '{}'", path))
            }
            _ => Ok(()),
        }
    }
}

/// Dashboard criteria for an optional status argument
pub fn status_query(status: Option<&str>) -> PlotQuery {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => PlotQuery::with_status(PlotStatus::from(s)),
        None => PlotQuery::default(),
    }
}

/// Reminder filter for an optional type argument
pub fn reminder_filter(reminder_type: Option<&str>) -> Option<ReminderType> {
    reminder_type
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ReminderType::from)
}
