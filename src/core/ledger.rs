//! Change ledger: local log of mutations not yet pushed to the remote store.
//!
//! Entries coalesce per entity (`{entityType}-{entityId}`):
//! - update after a tracked delete → update
//! - update after a tracked add    → add
//! - delete after a tracked add    → entry removed
//!
//! Every mutation is persisted immediately. Storage failures are reported
//! and otherwise ignored: the in-memory ledger stays authoritative.

use crate::core::clock::Clock;
use crate::models::change::{Change, ChangeType, EntityPayload, EntityType};
use crate::storage::{CHANGES_KEY, LocalStorage};
use crate::ui::messages::warning;
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;

pub const QUARANTINE_KEY: &str = "quarantined_changes";

pub struct ChangeLedger {
    storage: Box<dyn LocalStorage>,
    clock: Rc<dyn Clock>,
    changes: HashMap<String, Change>,
    last_timestamp: i64,
}

impl ChangeLedger {
    /// Load the persisted ledger. Entries that fail validation are moved
    /// to the quarantine key instead of being loaded.
    pub fn load(storage: Box<dyn LocalStorage>, clock: Rc<dyn Clock>) -> Self {
        let mut ledger = Self {
            storage,
            clock,
            changes: HashMap::new(),
            last_timestamp: 0,
        };

        let raw = match ledger.storage.get(CHANGES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ledger,
            Err(e) => {
                warning(format!("Failed to load pending changes: {}", e));
                return ledger;
            }
        };

        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warning(format!("Pending changes are unreadable, starting empty: {}", e));
                ledger.quarantine(vec![Value::String(raw)]);
                return ledger;
            }
        };

        let mut rejected = Vec::new();
        for entry in entries {
            match serde_json::from_value::<Change>(entry.clone()) {
                Ok(change) => {
                    ledger.last_timestamp = ledger.last_timestamp.max(change.timestamp);
                    ledger.changes.insert(change.id.clone(), change);
                }
                Err(e) => {
                    warning(format!("Quarantined malformed pending change: {}", e));
                    rejected.push(entry);
                }
            }
        }

        if !rejected.is_empty() {
            ledger.quarantine(rejected);
            ledger.save();
        }

        ledger
    }

    /// Record a freshly created entity.
    pub fn track_add(&mut self, payload: EntityPayload) {
        let key = Change::key(payload.entity_type(), payload.entity_id());
        let change_type = match self.changes.get(&key).map(|c| c.change_type) {
            Some(ChangeType::Delete) => ChangeType::Update,
            Some(ChangeType::Update) => ChangeType::Update,
            Some(ChangeType::Add) | None => ChangeType::Add,
        };
        self.put(payload, change_type);
    }

    /// Record an edit of an entity that may or may not exist remotely.
    pub fn track_add_or_update(&mut self, payload: EntityPayload) {
        let key = Change::key(payload.entity_type(), payload.entity_id());
        let change_type = match self.changes.get(&key).map(|c| c.change_type) {
            Some(ChangeType::Add) => ChangeType::Add,
            _ => ChangeType::Update,
        };
        self.put(payload, change_type);
    }

    pub fn track_delete(&mut self, entity_type: EntityType, entity_id: i64) {
        let key = Change::key(entity_type, entity_id);

        if matches!(
            self.changes.get(&key).map(|c| c.change_type),
            Some(ChangeType::Add)
        ) {
            // never left this device: nothing to sync
            self.changes.remove(&key);
        } else {
            let timestamp = self.next_timestamp();
            self.changes.insert(
                key.clone(),
                Change {
                    id: key,
                    entity_type,
                    change_type: ChangeType::Delete,
                    entity_id,
                    data: None,
                    timestamp,
                },
            );
        }

        self.save();
    }

    /// All pending changes, oldest first.
    pub fn changes(&self) -> Vec<Change> {
        let mut out: Vec<Change> = self.changes.values().cloned().collect();
        out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        out
    }

    pub fn changes_by_type(&self, entity_type: EntityType) -> Vec<Change> {
        self.changes()
            .into_iter()
            .filter(|c| c.entity_type == entity_type)
            .collect()
    }

    pub fn get(&self, entity_type: EntityType, entity_id: i64) -> Option<&Change> {
        self.changes.get(&Change::key(entity_type, entity_id))
    }

    pub fn clear(&mut self) {
        self.changes.clear();
        if let Err(e) = self.storage.remove(CHANGES_KEY) {
            warning(format!("Failed to clear pending changes: {}", e));
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn count(&self) -> usize {
        self.changes.len()
    }

    pub fn storage(&self) -> &dyn LocalStorage {
        self.storage.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn LocalStorage {
        self.storage.as_mut()
    }

    fn put(&mut self, payload: EntityPayload, change_type: ChangeType) {
        let entity_type = payload.entity_type();
        let entity_id = payload.entity_id();
        let key = Change::key(entity_type, entity_id);
        let timestamp = self.next_timestamp();

        self.changes.insert(
            key.clone(),
            Change {
                id: key,
                entity_type,
                change_type,
                entity_id,
                data: Some(payload),
                timestamp,
            },
        );

        self.save();
    }

    /// Wall-clock milliseconds, bumped so entries keep their recording order.
    fn next_timestamp(&mut self) -> i64 {
        let now = self.clock.now().timestamp_millis();
        self.last_timestamp = now.max(self.last_timestamp + 1);
        self.last_timestamp
    }

    fn save(&mut self) {
        let result = serde_json::to_string(&self.changes())
            .map_err(crate::errors::AppError::from)
            .and_then(|json| self.storage.set(CHANGES_KEY, &json));

        if let Err(e) = result {
            warning(format!("Failed to save pending changes: {}", e));
        }
    }

    fn quarantine(&mut self, mut rejected: Vec<Value>) {
        if let Ok(Some(existing)) = self.storage.get(QUARANTINE_KEY)
            && let Ok(mut previous) = serde_json::from_str::<Vec<Value>>(&existing)
        {
            previous.append(&mut rejected);
            rejected = previous;
        }

        let result = serde_json::to_string(&rejected)
            .map_err(crate::errors::AppError::from)
            .and_then(|json| self.storage.set(QUARANTINE_KEY, &json));

        if let Err(e) = result {
            warning(format!("Failed to quarantine pending changes: {}", e));
        }
    }
}
