use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::{Finding, FindingCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Call,
    Sms,
}

impl ContactKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Sms => "sms",
        }
    }

    /// Day, week and month ceilings.
    pub fn limits(self) -> ContactLimits {
        match self {
            Self::Call => ContactLimits {
                per_day: 1,
                per_week: 2,
                per_month: 8,
            },
            Self::Sms => ContactLimits {
                per_day: 2,
                per_week: 4,
                per_month: 16,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactLimits {
    pub per_day: usize,
    pub per_week: usize,
    pub per_month: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentContact {
    pub at: NaiveDateTime,
    pub kind: ContactKind,
}

/// Permitted local hours: weekdays 08:00-22:00, weekends 09:00-20:00.
pub fn permitted_hours(weekday: Weekday) -> (u32, u32) {
    match weekday {
        Weekday::Sat | Weekday::Sun => (9, 20),
        _ => (8, 22),
    }
}

pub(crate) fn check_timing(call_at: NaiveDateTime) -> Option<Finding> {
    let (open, close) = permitted_hours(call_at.weekday());
    let hour = call_at.hour();
    if (open..close).contains(&hour) {
        return None;
    }
    Some(Finding {
        category: FindingCategory::Timing,
        message: format!("Contact at {hour:02}:00 is outside permitted hours {open:02}:00-{close:02}:00"),
        matched: None,
        context: None,
    })
}

/// Returns `(violations, warnings)` for the contact being placed at `call_at`.
///
/// Only prior contacts of the same kind count; a contact at or after `call_at` is ignored.
pub(crate) fn check_frequency(
    call_at: NaiveDateTime,
    kind: ContactKind,
    recent: &[RecentContact],
) -> (Vec<Finding>, Vec<Finding>) {
    let limits = kind.limits();
    let prior: Vec<NaiveDateTime> = recent
        .iter()
        .filter(|contact| contact.kind == kind && contact.at < call_at)
        .map(|contact| contact.at)
        .collect();

    let day = prior.iter().filter(|at| at.date() == call_at.date()).count();
    let week = prior
        .iter()
        .filter(|at| call_at - **at < Duration::days(7))
        .count();
    let month = prior
        .iter()
        .filter(|at| call_at - **at < Duration::days(30))
        .count();

    let mut violations = Vec::new();
    let mut warnings = Vec::new();
    let finding = |period: &str, count: usize, limit: usize| Finding {
        category: FindingCategory::Frequency,
        message: format!(
            "{count} prior {} contact(s) this {period}, limit is {limit}",
            kind.label()
        ),
        matched: None,
        context: None,
    };

    if day >= limits.per_day {
        violations.push(finding("day", day, limits.per_day));
    }
    if week >= limits.per_week {
        warnings.push(finding("week", week, limits.per_week));
    }
    if month >= limits.per_month {
        warnings.push(finding("month", month, limits.per_month));
    }
    (violations, warnings)
}
