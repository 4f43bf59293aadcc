//! Remote snapshot wire format: `{version, updatedAt, data}`.
//!
//! Version 1 carries every entity collection, version 2 only the
//! per-trackable last completion.

use super::{
    completion::Completion, expense::Expense, grocery::GroceryItem, person::Person,
    trackable::Trackable,
};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const FULL_VERSION: u32 = 1;
pub const MINIMAL_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub currency: String,
    pub budget: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullData {
    #[serde(default)]
    pub trackables: Vec<Trackable>,
    #[serde(default)]
    pub completions: Vec<Completion>,
    #[serde(default)]
    pub groceries: Vec<GroceryItem>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<Vec<Person>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSnapshot {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub data: FullData,
}

impl FullSnapshot {
    pub fn new(updated_at: DateTime<Utc>, data: FullData) -> Self {
        Self {
            version: FULL_VERSION,
            updated_at,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalEntry {
    pub id: i64,
    #[serde(default)]
    pub last_completed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinimalData {
    #[serde(default)]
    pub trackables: Vec<MinimalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalSnapshot {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub data: MinimalData,
}

impl MinimalSnapshot {
    pub fn new(updated_at: DateTime<Utc>, trackables: Vec<MinimalEntry>) -> Self {
        Self {
            version: MINIMAL_VERSION,
            updated_at,
            data: MinimalData { trackables },
        }
    }
}

/// Either snapshot version, as fetched from the remote store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    Full(FullSnapshot),
    Minimal(MinimalSnapshot),
}

impl Snapshot {
    pub fn version(&self) -> u32 {
        match self {
            Snapshot::Full(s) => s.version,
            Snapshot::Minimal(s) => s.version,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Snapshot::Full(s) => s.updated_at,
            Snapshot::Minimal(s) => s.updated_at,
        }
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| D::Error::custom("snapshot has no numeric version"))?;

        match version {
            v if v == u64::from(FULL_VERSION) => serde_json::from_value(value)
                .map(Snapshot::Full)
                .map_err(D::Error::custom),
            v if v == u64::from(MINIMAL_VERSION) => serde_json::from_value(value)
                .map(Snapshot::Minimal)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "unsupported snapshot version {}",
                other
            ))),
        }
    }
}
