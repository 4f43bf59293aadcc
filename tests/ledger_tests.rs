use chrono::Duration;
use rhousekeep::core::clock::FixedClock;
use rhousekeep::core::ledger::{ChangeLedger, QUARANTINE_KEY};
use rhousekeep::models::change::{ChangeType, EntityPayload, EntityType};
use rhousekeep::models::grocery::GroceryItem;
use rhousekeep::storage::{CHANGES_KEY, LocalStorage, MemoryStorage};
use std::rc::Rc;

mod common;
use common::{chore, ts};

fn clock() -> Rc<FixedClock> {
    Rc::new(FixedClock::new(ts("2024-03-04T12:00:00Z")))
}

fn milk(id: i64) -> EntityPayload {
    EntityPayload::Grocery(GroceryItem {
        id,
        name: "Milk".into(),
        quantity: Some("2 l".into()),
        category: None,
        checked: false,
        created_at: ts("2024-03-04T11:00:00Z"),
        order: 1,
    })
}

fn empty_ledger() -> ChangeLedger {
    ChangeLedger::load(Box::new(MemoryStorage::new()), clock())
}

#[test]
fn add_then_update_stays_an_add() {
    let mut ledger = empty_ledger();

    ledger.track_add(milk(1));
    ledger.track_add_or_update(milk(1));

    assert_eq!(ledger.count(), 1);
    let change = ledger.get(EntityType::Grocery, 1).expect("tracked");
    assert_eq!(change.change_type, ChangeType::Add);
    assert_eq!(change.id, "grocery-1");
}

#[test]
fn add_then_delete_leaves_nothing() {
    let mut ledger = empty_ledger();

    ledger.track_add(milk(1));
    ledger.track_delete(EntityType::Grocery, 1);

    assert!(!ledger.has_changes());
}

#[test]
fn delete_then_update_becomes_update() {
    let mut ledger = empty_ledger();

    ledger.track_delete(EntityType::Grocery, 7);
    assert_eq!(
        ledger.get(EntityType::Grocery, 7).map(|c| c.change_type),
        Some(ChangeType::Delete)
    );

    ledger.track_add_or_update(milk(7));
    let change = ledger.get(EntityType::Grocery, 7).expect("tracked");
    assert_eq!(change.change_type, ChangeType::Update);
    assert!(change.data.is_some());
}

#[test]
fn update_of_untracked_entity_is_an_update() {
    let mut ledger = empty_ledger();

    ledger.track_add_or_update(EntityPayload::Trackable(chore(3, "Dishes", "2024-03-01T10:00:00Z")));

    assert_eq!(
        ledger.get(EntityType::Trackable, 3).map(|c| c.change_type),
        Some(ChangeType::Update)
    );
}

#[test]
fn update_then_delete_keeps_only_the_delete() {
    let mut ledger = empty_ledger();

    ledger.track_add_or_update(milk(5));
    ledger.track_delete(EntityType::Grocery, 5);

    let changes = ledger.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].id, "grocery-5");
    assert_eq!(changes[0].change_type, ChangeType::Delete);
    assert!(changes[0].data.is_none());
}

#[test]
fn changes_are_ordered_by_recording_time() {
    let clock = clock();
    let mut ledger = ChangeLedger::load(Box::new(MemoryStorage::new()), clock.clone());

    ledger.track_add(milk(2));
    ledger.track_add(EntityPayload::Trackable(chore(1, "Dishes", "2024-03-01T10:00:00Z")));
    clock.advance(Duration::seconds(5));
    ledger.track_delete(EntityType::Expense, 4);

    let changes = ledger.changes();
    let ids: Vec<&str> = changes.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["grocery-2", "trackable-1", "expense-4"]);

    // same clock reading: timestamps still strictly increase
    assert!(changes[0].timestamp < changes[1].timestamp);
    assert!(changes[1].timestamp < changes[2].timestamp);

    assert_eq!(ledger.changes_by_type(EntityType::Grocery).len(), 1);
    assert!(ledger.changes_by_type(EntityType::Completion).is_empty());
}

#[test]
fn ledger_survives_a_reload() {
    let mut ledger = empty_ledger();
    ledger.track_add(milk(1));
    ledger.track_delete(EntityType::Trackable, 9);

    let raw = ledger
        .storage()
        .get(CHANGES_KEY)
        .expect("readable")
        .expect("persisted");

    let reloaded = ChangeLedger::load(Box::new(MemoryStorage::with_value(CHANGES_KEY, &raw)), clock());

    assert_eq!(reloaded.changes(), ledger.changes());
}

#[test]
fn clear_removes_persisted_changes() {
    let mut ledger = empty_ledger();
    ledger.track_add(milk(1));

    ledger.clear();

    assert_eq!(ledger.count(), 0);
    assert!(ledger.storage().get(CHANGES_KEY).expect("readable").is_none());
}

#[test]
fn malformed_entries_are_quarantined() {
    let raw = r#"[
        {"id":"grocery-1","entityType":"grocery","changeType":"delete","entityId":1,"timestamp":10},
        {"id":"grocery-2","entityType":"grocery","changeType":"update","entityId":2,"timestamp":11},
        {"id":"trackable-3","entityType":"trackable","changeType":"delete","entityId":"3","timestamp":12},
        {"entityType":"unknown","changeType":"add","entityId":4,"timestamp":13}
    ]"#;

    let ledger = ChangeLedger::load(Box::new(MemoryStorage::with_value(CHANGES_KEY, raw)), clock());

    let ids: Vec<String> = ledger.changes().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["grocery-1", "trackable-3"]);

    let quarantined = ledger
        .storage()
        .get(QUARANTINE_KEY)
        .expect("readable")
        .expect("quarantine written");
    let rejected: Vec<serde_json::Value> = serde_json::from_str(&quarantined).expect("json array");
    assert_eq!(rejected.len(), 2);
}

#[test]
fn unreadable_ledger_starts_empty() {
    let ledger = ChangeLedger::load(
        Box::new(MemoryStorage::with_value(CHANGES_KEY, "{not json")),
        clock(),
    );

    assert!(!ledger.has_changes());
    assert!(ledger.storage().get(QUARANTINE_KEY).expect("readable").is_some());
}

#[test]
fn storage_failures_keep_the_in_memory_ledger() {
    let mut storage = MemoryStorage::new();
    storage.fail_writes = true;
    let mut ledger = ChangeLedger::load(Box::new(storage), clock());

    ledger.track_add(milk(1));
    ledger.track_delete(EntityType::Expense, 2);

    assert_eq!(ledger.count(), 2);
    assert!(ledger.storage().get(CHANGES_KEY).expect("readable").is_none());
}
