use crate::core::recurrence::{days_overdue, debt_for, next_due};
use crate::models::completion::Completion;
use crate::models::status::TrackableStatus;
use crate::models::trackable::Trackable;
use crate::utils::date::local_day;
use chrono::{DateTime, Datelike, Local, Utc};
use std::cmp::Ordering;

/// Derive the display status of one trackable from its full completion history.
pub fn compute_status(
    trackable: &Trackable,
    completions: &[Completion],
    now: DateTime<Utc>,
) -> TrackableStatus {
    let last_completed = completions.iter().map(|c| c.completed_at).max();

    // a stored due date (set on add, completion or reschedule) wins for chores
    let due = match (trackable.is_chore(), trackable.next_due_date) {
        (true, Some(stored)) => stored,
        _ => next_due(
            last_completed.unwrap_or(trackable.created_at),
            &trackable.recurrence,
        ),
    };

    // a completed one-time chore stays at zero until it is un-completed
    let overdue_days = if trackable.is_one_time_chore() && last_completed.is_some() {
        0
    } else {
        days_overdue(due, now)
    };

    let (debt, monthly_total, yearly_total) = if trackable.is_exercise() {
        let info = debt_for(trackable, now, completions);
        let local_now = now.with_timezone(&Local);

        let mut month = 0.0;
        let mut year = 0.0;
        for c in completions {
            let at = c.completed_at.with_timezone(&Local);
            if at.year() == local_now.year() {
                year += c.units();
                if at.month() == local_now.month() {
                    month += c.units();
                }
            }
        }
        (Some(info), month, year)
    } else {
        (None, 0.0, 0.0)
    };

    let is_overdue = match &debt {
        Some(info) => info.debt > 0.0,
        None => overdue_days > 0,
    };

    TrackableStatus {
        trackable: trackable.clone(),
        last_completed,
        next_due: due,
        is_overdue,
        days_overdue: overdue_days,
        completion_count: completions.len(),
        debt,
        monthly_total,
        yearly_total,
    }
}

/// Display ordering.
///
/// Chores: overdue, then due today, then one-time chores, then the rest;
/// ties by ascending due date. Exercises: highest debt first, then due date.
pub fn sort_for_display(items: &mut [TrackableStatus], now: DateTime<Utc>) {
    items.sort_by(|a, b| compare_for_display(a, b, now));
}

fn compare_for_display(a: &TrackableStatus, b: &TrackableStatus, now: DateTime<Utc>) -> Ordering {
    let (ta, tb) = (&a.trackable, &b.trackable);

    if ta.is_exercise() && tb.is_exercise() {
        return b
            .debt_amount()
            .total_cmp(&a.debt_amount())
            .then_with(|| a.next_due.cmp(&b.next_due));
    }

    if ta.is_chore() && tb.is_chore() {
        let key = |s: &TrackableStatus| {
            (
                s.days_overdue > 0,
                is_due_today(s, now),
                s.trackable.is_one_time_chore(),
            )
        };
        // `true` sorts first in each bucket flag
        return key(b)
            .cmp(&key(a))
            .then_with(|| a.next_due.cmp(&b.next_due));
    }

    Ordering::Equal
}

/// True when the chore's due date falls on the local day of `now`.
pub fn is_due_today(status: &TrackableStatus, now: DateTime<Utc>) -> bool {
    local_day(status.next_due) == local_day(now)
}
