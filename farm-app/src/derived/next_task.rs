//! "Next task" advice for a plot.
//!
//! Advice comes from an ordered rule table; the first matching rule wins.
//! Rules keyed on status come first. A plot whose status has no rules falls
//! through to rules keyed on a crop-name substring, then to a generic band.

use chrono::{DateTime, Utc};
use farm_client::dates::parse_timestamp;
use farm_client::{Plot, PlotStatus};

use super::DAY_MS;

/// What a rule is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Status(&'static str),
    /// Case-insensitive substring of the current crop's name
    Crop(&'static str),
    Any,
}

/// One row of the advice table; `max_days` is inclusive, `None` is open-ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub subject: Subject,
    pub max_days: Option<i64>,
    pub message: &'static str,
}

const fn rule(subject: Subject, max_days: Option<i64>, message: &'static str) -> Rule {
    Rule {
        subject,
        max_days,
        message,
    }
}

use Subject::{Any, Crop, Status};

/// Advice table, in match order
pub const RULES: &[Rule] = &[
    rule(Status("planting"), Some(7), "Water seedlings daily"),
    rule(Status("planting"), Some(14), "Harden off transplants"),
    rule(Status("planting"), Some(21), "Check germination and fill gaps"),
    rule(Status("planting"), None, "Transplant or thin seedlings"),
    rule(Status("growing"), Some(7), "Apply balanced fertilizer"),
    rule(Status("growing"), Some(30), "Check for pests weekly"),
    rule(Status("growing"), Some(60), "Apply top dressing of nitrogen"),
    rule(Status("growing"), Some(90), "Monitor for disease and irrigate as needed"),
    rule(Status("growing"), None, "Prepare for harvest"),
    rule(Status("ready"), None, "Harvest ready!"),
    rule(Status("harvested"), Some(7), "Clear crop residue"),
    rule(Status("harvested"), Some(30), "Prepare soil for next season"),
    rule(Status("harvested"), None, "Plan next crop rotation"),
    rule(Crop("wheat"), Some(30), "Irrigate wheat at crown root stage"),
    rule(Crop("wheat"), Some(90), "Apply urea top dressing to wheat"),
    rule(Crop("wheat"), None, "Monitor wheat for rust"),
    rule(Crop("corn"), Some(21), "Thin corn seedlings"),
    rule(Crop("corn"), Some(60), "Side-dress corn with nitrogen"),
    rule(Crop("corn"), None, "Check corn ears for maturity"),
    rule(Crop("tomato"), Some(14), "Stake tomato plants"),
    rule(Crop("tomato"), Some(45), "Prune tomato suckers weekly"),
    rule(Crop("tomato"), None, "Pick ripe tomatoes daily"),
    rule(Crop("rice"), Some(30), "Maintain standing water in paddy"),
    rule(Crop("rice"), Some(90), "Apply potash to rice"),
    rule(Crop("rice"), None, "Drain field before rice harvest"),
    rule(Any, Some(7), "Water daily"),
    rule(Any, Some(30), "Check soil moisture weekly"),
    rule(Any, None, "Monitor crop health"),
];

/// Whole days since planting, floored; 0 without a usable planted date.
///
/// A planted date in the future yields a negative count.
pub fn days_since_planted(plot: &Plot, now: DateTime<Utc>) -> i64 {
    plot.planted_date
        .as_deref()
        .and_then(parse_timestamp)
        .map(|planted| (now - planted).num_milliseconds().div_euclid(DAY_MS))
        .unwrap_or(0)
}

fn status_key(status: &PlotStatus) -> String {
    status.as_str().trim().to_ascii_lowercase()
}

impl Rule {
    fn matches(&self, status: &str, crop: &str, days: i64) -> bool {
        let subject = match self.subject {
            Status(s) => s == status,
            Crop(fragment) => crop.contains(fragment),
            Any => true,
        };
        subject && self.max_days.map_or(true, |max| days <= max)
    }
}

/// Advice for `plot` as of `now`
pub fn next_task(plot: &Plot, now: DateTime<Utc>) -> &'static str {
    let status = status_key(&plot.status);
    let crop = plot.crop_name().unwrap_or_default().to_lowercase();
    let days = days_since_planted(plot, now);

    RULES
        .iter()
        .find(|r| r.matches(&status, &crop, days))
        .map(|r| r.message)
        .unwrap_or("Monitor crop health")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::{Duration, TimeZone};
    use farm_client::CropRef;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap()
    }

    fn planted(status: &str, crop: Option<&str>, days_ago: i64) -> Plot {
        let mut plot = fixtures::plot(1, "Test", status);
        plot.current_crop = crop.map(|c| CropRef::Name(c.to_string()));
        plot.planted_date = Some((now() - Duration::days(days_ago)).to_rfc3339());
        plot
    }

    #[test]
    fn test_growing_first_week_fertilizer() {
        for day in 0..=7 {
            let plot = planted("growing", Some("Wheat"), day);
            assert_eq!(next_task(&plot, now()), "Apply balanced fertilizer", "day {}", day);
        }
        let plot = planted("growing", Some("Wheat"), 8);
        assert_eq!(next_task(&plot, now()), "Check for pests weekly");
    }

    #[test]
    fn test_planting_bands() {
        assert_eq!(
            next_task(&planted("planting", None, 0), now()),
            "Water seedlings daily"
        );
        assert_eq!(
            next_task(&planted("planting", None, 12), now()),
            "Harden off transplants"
        );
    }

    #[test]
    fn test_missing_planted_date_is_day_zero() {
        let mut plot = fixtures::plot(1, "Test", "growing");
        assert_eq!(days_since_planted(&plot, now()), 0);
        assert_eq!(next_task(&plot, now()), "Apply balanced fertilizer");

        plot.planted_date = Some("not a date".into());
        assert_eq!(days_since_planted(&plot, now()), 0);
    }

    #[test]
    fn test_days_are_floored() {
        let mut plot = fixtures::plot(1, "Test", "growing");
        plot.planted_date = Some((now() - Duration::hours(47)).to_rfc3339());
        assert_eq!(days_since_planted(&plot, now()), 1);

        plot.planted_date = Some((now() + Duration::hours(1)).to_rfc3339());
        assert_eq!(days_since_planted(&plot, now()), -1);
    }

    #[test]
    fn test_ready_ignores_days() {
        assert_eq!(next_task(&planted("ready", None, 300), now()), "Harvest ready!");
    }

    #[test]
    fn test_unknown_status_uses_crop_rules() {
        assert_eq!(
            next_task(&planted("fallow", Some("Cherry Tomatoes"), 10), now()),
            "Stake tomato plants"
        );
        assert_eq!(
            next_task(&planted("fallow", Some("Basmati Rice"), 100), now()),
            "Drain field before rice harvest"
        );
    }

    #[test]
    fn test_status_rules_take_precedence_over_crop() {
        assert_eq!(
            next_task(&planted("harvested", Some("Corn"), 2), now()),
            "Clear crop residue"
        );
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(next_task(&planted("fallow", None, 3), now()), "Water daily");
        assert_eq!(
            next_task(&planted("fallow", Some("Mustard"), 20), now()),
            "Check soil moisture weekly"
        );
        assert_eq!(next_task(&planted("fallow", None, 31), now()), "Monitor crop health");
    }

    #[test]
    fn test_every_subject_has_open_ended_row() {
        let mut subjects: Vec<Subject> = RULES.iter().map(|r| r.subject).collect();
        subjects.dedup();
        for subject in subjects {
            let last = RULES.iter().filter(|r| r.subject == subject).last().unwrap();
            assert_eq!(last.max_days, None, "{:?}", subject);
        }
    }
}
