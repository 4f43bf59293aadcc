//! Pending local mutations waiting for the next sync.
//!
//! The payload of a change is a tagged variant selected by `entityType`, so a
//! stored ledger entry is either fully typed or rejected when it is loaded.

use super::{completion::Completion, expense::Expense, grocery::GroceryItem, trackable::Trackable};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Trackable,
    Completion,
    Grocery,
    Expense,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Trackable => "trackable",
            EntityType::Completion => "completion",
            EntityType::Grocery => "grocery",
            EntityType::Expense => "expense",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Add,
    Update,
    Delete,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Add => "add",
            ChangeType::Update => "update",
            ChangeType::Delete => "delete",
        }
    }
}

/// Full entity carried by an add/update change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityPayload {
    Trackable(Trackable),
    Completion(Completion),
    Grocery(GroceryItem),
    Expense(Expense),
}

impl EntityPayload {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityPayload::Trackable(_) => EntityType::Trackable,
            EntityPayload::Completion(_) => EntityType::Completion,
            EntityPayload::Grocery(_) => EntityType::Grocery,
            EntityPayload::Expense(_) => EntityType::Expense,
        }
    }

    pub fn entity_id(&self) -> i64 {
        match self {
            EntityPayload::Trackable(t) => t.id,
            EntityPayload::Completion(c) => c.id,
            EntityPayload::Grocery(g) => g.id,
            EntityPayload::Expense(e) => e.id,
        }
    }

    /// Decode an untyped payload as the entity named by `entity_type`.
    pub fn from_value(entity_type: EntityType, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match entity_type {
            EntityType::Trackable => EntityPayload::Trackable(serde_json::from_value(value)?),
            EntityType::Completion => EntityPayload::Completion(serde_json::from_value(value)?),
            EntityType::Grocery => EntityPayload::Grocery(serde_json::from_value(value)?),
            EntityType::Expense => EntityPayload::Expense(serde_json::from_value(value)?),
        })
    }
}

/// One ledger entry. At most one exists per `(entity_type, entity_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawChange")]
pub struct Change {
    pub id: String,
    pub entity_type: EntityType,
    pub change_type: ChangeType,
    pub entity_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<EntityPayload>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Change {
    pub fn key(entity_type: EntityType, entity_id: i64) -> String {
        format!("{}-{}", entity_type.as_str(), entity_id)
    }
}

/// Wire shape of a stored change, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChange {
    #[serde(default)]
    id: Option<String>,
    entity_type: EntityType,
    change_type: ChangeType,
    entity_id: Value,
    #[serde(default)]
    data: Option<Value>,
    timestamp: i64,
}

impl TryFrom<RawChange> for Change {
    type Error = String;

    fn try_from(raw: RawChange) -> Result<Self, Self::Error> {
        let entity_id = match &raw.entity_id {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| format!("invalid entityId {}", raw.entity_id))?;

        let key = Change::key(raw.entity_type, entity_id);
        if let Some(id) = &raw.id
            && *id != key
        {
            return Err(format!("change id '{}' does not match '{}'", id, key));
        }

        let data = match (raw.change_type, raw.data) {
            (ChangeType::Delete, _) => None,
            (_, None) | (_, Some(Value::Null)) => {
                return Err(format!("{} change for {} has no payload", raw.change_type.as_str(), key));
            }
            (_, Some(value)) => {
                let payload = EntityPayload::from_value(raw.entity_type, value)
                    .map_err(|e| format!("malformed payload for {}: {}", key, e))?;
                if payload.entity_id() != entity_id {
                    return Err(format!(
                        "payload id {} does not match {}",
                        payload.entity_id(),
                        key
                    ));
                }
                Some(payload)
            }
        };

        Ok(Change {
            id: key,
            entity_type: raw.entity_type,
            change_type: raw.change_type,
            entity_id,
            data,
            timestamp: raw.timestamp,
        })
    }
}
