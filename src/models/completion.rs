use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded instance of satisfying a trackable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub id: i64,
    pub trackable_id: i64,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Completion {
    pub fn new(trackable_id: i64, completed_at: DateTime<Utc>, amount: Option<f64>) -> Self {
        Self {
            id: 0,
            trackable_id,
            completed_at,
            notes: None,
            amount,
        }
    }

    /// Quota units contributed (a completion without an amount counts as 1).
    pub fn units(&self) -> f64 {
        self.amount.unwrap_or(1.0)
    }
}
