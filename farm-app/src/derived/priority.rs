//! Reminder urgency, recomputed on every call and never stored.

use chrono::{DateTime, Utc};
use farm_client::dates::parse_timestamp;
use farm_client::Reminder;
use serde::Serialize;
use std::fmt;

use super::DAY_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Days until `due`, rounded up; negative when overdue
pub fn days_until_due(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (due - now).num_milliseconds();
    -(-ms).div_euclid(DAY_MS)
}

/// `High` within 2 days, `Medium` within 5, otherwise `Low`.
///
/// An unparseable due date is `Low`.
pub fn priority(reminder: &Reminder, now: DateTime<Utc>) -> Priority {
    match parse_timestamp(&reminder.due_date) {
        Some(due) => match days_until_due(due, now) {
            d if d <= 2 => Priority::High,
            d if d <= 5 => Priority::Medium,
            _ => Priority::Low,
        },
        None => Priority::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    fn due_in(offset: Duration) -> Reminder {
        fixtures::reminder(1, 1, &(now() + offset).to_rfc3339())
    }

    #[test]
    fn test_boundary_at_two_days() {
        assert_eq!(priority(&due_in(Duration::days(2)), now()), Priority::High);
        assert_eq!(
            priority(&due_in(Duration::days(2) + Duration::seconds(1)), now()),
            Priority::Medium
        );
    }

    #[test]
    fn test_boundary_at_five_days() {
        assert_eq!(priority(&due_in(Duration::days(5)), now()), Priority::Medium);
        assert_eq!(
            priority(&due_in(Duration::days(5) + Duration::seconds(1)), now()),
            Priority::Low
        );
    }

    #[test]
    fn test_overdue_is_high() {
        assert_eq!(priority(&due_in(Duration::days(-3)), now()), Priority::High);
    }

    #[test]
    fn test_days_round_up() {
        assert_eq!(days_until_due(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until_due(now(), now()), 0);
        assert_eq!(days_until_due(now() - Duration::hours(25), now()), -1);
    }

    #[test]
    fn test_plain_date_due() {
        // 2024-05-04 midnight is 2 days 14.5 hours away: rounds up to 3
        let reminder = fixtures::reminder(1, 1, "2024-05-04");
        assert_eq!(priority(&reminder, now()), Priority::Medium);
    }

    #[test]
    fn test_garbage_due_date_is_low() {
        let reminder = fixtures::reminder(1, 1, "soon");
        assert_eq!(priority(&reminder, now()), Priority::Low);
    }
}
