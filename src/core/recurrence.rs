//! Recurrence and exercise-debt arithmetic.
//!
//! Every function here is pure: "now" is always passed in.

use crate::models::completion::Completion;
use crate::models::status::DebtInfo;
use crate::models::trackable::{Recurrence, RecurrenceUnit, Trackable};
use crate::utils::date::{add_days, add_months, floor_days_between};
use chrono::{DateTime, Utc};

/// Advance `base` (last completion, or creation time) by one interval.
pub fn next_due(base: DateTime<Utc>, recurrence: &Recurrence) -> DateTime<Utc> {
    let every = recurrence.every as i64;
    match recurrence.unit {
        RecurrenceUnit::Days => add_days(base, every),
        RecurrenceUnit::Weeks => add_days(base, every * 7),
        RecurrenceUnit::Months => add_months(base, recurrence.every),
    }
}

/// Whole days past `next_due`, never negative.
pub fn days_overdue(next_due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    floor_days_between(next_due, now).max(0)
}

/// Period length used for debt bucketing. Months count as 30 days.
pub fn recurrence_in_days(recurrence: &Recurrence) -> i64 {
    let every = recurrence.every as i64;
    match recurrence.unit {
        RecurrenceUnit::Days => every,
        RecurrenceUnit::Weeks => every * 7,
        RecurrenceUnit::Months => every * 30,
    }
}

/// Quota state of an exercise.
///
/// Debt only accrues from fully elapsed periods; the current period's
/// shortfall never counts. At most one period may be banked in advance.
pub fn exercise_debt(
    target: f64,
    recurrence: &Recurrence,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    completions: &[Completion],
) -> DebtInfo {
    let period_days = recurrence_in_days(recurrence).max(1);
    let days_since_creation = floor_days_between(created_at, now);
    let past_periods = days_since_creation.div_euclid(period_days).max(0);

    let past_required = past_periods as f64 * target;
    let total_completed: f64 = completions.iter().map(Completion::units).sum();

    let debt = (past_required - total_completed).max(0.0);
    let available_for_current = (total_completed - past_required).max(0.0);
    let current_period_done = available_for_current.min(target);
    let advance_amount = (available_for_current - target).max(0.0).min(target);
    let max_allowed = (past_periods + 2) as f64 * target;

    DebtInfo {
        past_periods,
        debt,
        total_completed,
        current_period_target: target,
        current_period_done,
        advance_amount,
        max_allowed,
        can_do_advance: debt == 0.0 && total_completed < max_allowed,
    }
}

/// Debt of a stored exercise trackable.
pub fn debt_for(trackable: &Trackable, now: DateTime<Utc>, completions: &[Completion]) -> DebtInfo {
    exercise_debt(
        trackable.target(),
        &trackable.recurrence,
        trackable.created_at,
        now,
        completions,
    )
}

/// How many more units may be recorded before the advance ceiling.
pub fn remaining_allowed(info: &DebtInfo) -> f64 {
    (info.max_allowed - info.total_completed).max(0.0)
}
