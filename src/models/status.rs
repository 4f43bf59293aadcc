use super::trackable::Trackable;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Quota bookkeeping of an exercise at a given instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DebtInfo {
    pub past_periods: i64,
    pub debt: f64,
    pub total_completed: f64,
    pub current_period_target: f64,
    pub current_period_done: f64,
    pub advance_amount: f64,
    pub max_allowed: f64,
    pub can_do_advance: bool,
}

/// A trackable together with everything derived for display.
#[derive(Debug, Clone, Serialize)]
pub struct TrackableStatus {
    pub trackable: Trackable,
    pub last_completed: Option<DateTime<Utc>>,
    pub next_due: DateTime<Utc>,
    pub is_overdue: bool,
    pub days_overdue: i64,
    pub completion_count: usize,
    pub debt: Option<DebtInfo>,
    pub monthly_total: f64,
    pub yearly_total: f64,
}

impl TrackableStatus {
    pub fn debt_amount(&self) -> f64 {
        self.debt.map(|d| d.debt).unwrap_or(0.0)
    }
}
