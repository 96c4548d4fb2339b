use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::workflows::casework::domain::ContactPreferences;

const CONTACT_WINDOW_START: u32 = 9;
const CONTACT_WINDOW_END: u32 = 20;
const PROMPT_CONTACT_MINUTES: i64 = 15;

/// Contact urgency on a 1–5 scale from overdue length.
pub(crate) fn urgency(overdue_days: u32) -> u8 {
    match overdue_days {
        d if d > 90 => 5,
        d if d > 60 => 4,
        d if d > 30 => 3,
        d if d > 14 => 2,
        _ => 1,
    }
}

fn at_hour(moment: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    moment.date().and_time(time)
}

fn is_weekend(moment: NaiveDateTime) -> bool {
    matches!(moment.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Pick the next contact moment for a credit of the given urgency.
pub(crate) fn recommended_contact_time(
    now: NaiveDateTime,
    urgency: u8,
    preferences: &ContactPreferences,
) -> NaiveDateTime {
    let mut recommended = if urgency >= 4 {
        let hour = now.hour();
        if (CONTACT_WINDOW_START..CONTACT_WINDOW_END).contains(&hour) {
            now + Duration::minutes(PROMPT_CONTACT_MINUTES)
        } else if hour >= CONTACT_WINDOW_END {
            at_hour(now, CONTACT_WINDOW_START) + Duration::days(1)
        } else {
            at_hour(now, CONTACT_WINDOW_START)
        }
    } else {
        let best_hour = preferences.best_hour.min(23);
        let current = i64::from(now.weekday().num_days_from_monday());
        let target = i64::from(preferences.best_weekday.num_days_from_monday());
        let mut days_ahead = (target - current).rem_euclid(7);
        if days_ahead == 0 && now.hour() >= best_hour {
            days_ahead = 7;
        }
        at_hour(now, best_hour) + Duration::days(days_ahead)
    };

    if urgency < 3 && is_weekend(recommended) {
        let days_to_monday = 7 - i64::from(recommended.weekday().num_days_from_monday());
        recommended += Duration::days(days_to_monday);
    }

    recommended
}
