//! Application routes and the authentication guard.

use farm_client::Id;
use std::fmt;

/// Every screen the application knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Dashboard,
    Plots,
    AddPlot,
    PlotDetails(Id),
    EditPlot(Id),
    Timeline(Id),
    AddLifecycleEvent(Id),
    AddFertilizer(Id),
    AddPesticide(Id),
    AddIrrigation(Id),
    AddExpense(Id),
    Schedule,
    Reports,
    Settings,
    Login,
    Signup,
}

/// Who may visit a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Requires a valid session
    Protected,
    /// Only for visitors without a session
    AuthOnly,
    Public,
}

/// Outcome of the route guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route that is actually shown
    pub fn target(&self) -> Route {
        match self {
            Self::Allow(route) | Self::Redirect(route) => *route,
        }
    }
}

impl Route {
    /// Parse a path such as `/plots/3/edit`. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Root,
            ["dashboard"] => Self::Dashboard,
            ["plots"] => Self::Plots,
            ["add-plot"] => Self::AddPlot,
            ["schedule"] => Self::Schedule,
            ["reports"] => Self::Reports,
            ["settings"] => Self::Settings,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["plots", id, rest @ ..] => {
                let id: Id = id.parse().ok()?;
                match rest {
                    [] => Self::PlotDetails(id),
                    ["edit"] => Self::EditPlot(id),
                    ["timeline"] => Self::Timeline(id),
                    ["timeline", "add-event"] => Self::AddLifecycleEvent(id),
                    ["add-fertilizer"] => Self::AddFertilizer(id),
                    ["add-pesticide"] => Self::AddPesticide(id),
                    ["add-irrigation"] => Self::AddIrrigation(id),
                    ["add-expense"] => Self::AddExpense(id),
                    _ => return None,
                }
            }
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Plots => "/plots".to_string(),
            Self::AddPlot => "/add-plot".to_string(),
            Self::PlotDetails(id) => format!("/plots/{}", id),
            Self::EditPlot(id) => format!("/plots/{}/edit", id),
            Self::Timeline(id) => format!("/plots/{}/timeline", id),
            Self::AddLifecycleEvent(id) => format!("/plots/{}/timeline/add-event", id),
            Self::AddFertilizer(id) => format!("/plots/{}/add-fertilizer", id),
            Self::AddPesticide(id) => format!("/plots/{}/add-pesticide", id),
            Self::AddIrrigation(id) => format!("/plots/{}/add-irrigation", id),
            Self::AddExpense(id) => format!("/plots/{}/add-expense", id),
            Self::Schedule => "/schedule".to_string(),
            Self::Reports => "/reports".to_string(),
            Self::Settings => "/settings".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Signup => Access::AuthOnly,
            Self::Root => Access::Public,
            _ => Access::Protected,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decide where a visitor ends up.
///
/// `/` always forwards to the dashboard, which in turn sends a visitor
/// without a session to the login screen.
pub fn guard(route: Route, authenticated: bool) -> Navigation {
    match (route.access(), authenticated) {
        (Access::Public, _) => {
            let next = guard(Route::Dashboard, authenticated);
            Navigation::Redirect(next.target())
        }
        (Access::Protected, false) => Navigation::Redirect(Route::Login),
        (Access::AuthOnly, true) => Navigation::Redirect(Route::Dashboard),
        _ => Navigation::Allow(route),
    }
}
