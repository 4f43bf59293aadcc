use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub checked: bool,
    pub created_at: DateTime<Utc>,
    /// Manual display position; only the relative ordering matters.
    #[serde(default)]
    pub order: i64,
}

/// Partial edit of a grocery item. Empty strings clear the optional fields.
#[derive(Debug, Clone, Default)]
pub struct GroceryPatch {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub category: Option<String>,
}

impl GroceryPatch {
    pub fn apply(&self, item: &mut GroceryItem) {
        if let Some(name) = &self.name {
            item.name = name.trim().to_string();
        }
        if let Some(q) = &self.quantity {
            item.quantity = non_empty(q);
        }
        if let Some(c) = &self.category {
            item.category = non_empty(c);
        }
    }
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}
