//! Formatting utilities used for CLI outputs.

use crate::core::recurrence::days_overdue;
use crate::models::status::TrackableStatus;
use crate::utils::date::{format_day, local_day};
use chrono::{DateTime, Utc};

/// Amount without a trailing ".0" for whole numbers (12 → "12", 2.5 → "2.5").
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn format_money(value: f64, currency: &str) -> String {
    format!("{:.2} {}", value, currency)
}

/// "in 3 days", "today", "2 days overdue" relative to `now`.
pub fn describe_due(next_due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let overdue = days_overdue(next_due, now);
    if overdue > 0 {
        return match overdue {
            1 => "1 day overdue".to_string(),
            n => format!("{} days overdue", n),
        };
    }

    let ahead = (local_day(next_due) - local_day(now)).num_days();
    match ahead {
        i64::MIN..=0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {} days ({})", n, format_day(next_due)),
    }
}

/// Quota summary of an exercise: "done/target unit", plus debt or advance.
pub fn describe_quota(status: &TrackableStatus) -> String {
    let Some(debt) = status.debt else {
        return String::new();
    };
    let unit = status
        .trackable
        .exercise_unit
        .map(|u| u.to_db_str())
        .unwrap_or("reps");

    let mut out = format!(
        "{}/{} {}",
        format_amount(debt.current_period_done),
        format_amount(debt.current_period_target),
        unit
    );
    if debt.debt > 0.0 {
        out.push_str(&format!(", debt {}", format_amount(debt.debt)));
    } else if debt.advance_amount > 0.0 {
        out.push_str(&format!(", +{} ahead", format_amount(debt.advance_amount)));
    }
    out
}
