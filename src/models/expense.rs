use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cost: f64,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cost: Option<f64>,
}

impl ExpensePatch {
    pub fn apply(&self, e: &mut Expense) {
        if let Some(name) = &self.name {
            e.name = name.trim().to_string();
        }
        if let Some(desc) = &self.description {
            e.description = super::grocery::non_empty(desc);
        }
        if let Some(cost) = self.cost {
            e.cost = cost;
        }
    }
}
