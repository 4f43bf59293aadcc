#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Utc};
use rhousekeep::config::Config;
use rhousekeep::context::AppContext;
use rhousekeep::core::clock::FixedClock;
use rhousekeep::db::initialize::init_db;
use rhousekeep::db::pool::DbPool;
use rhousekeep::models::trackable::{Recurrence, RecurrenceUnit, Trackable, TrackableType};
use rhousekeep::storage::MemoryStorage;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

pub fn rhk() -> Command {
    cargo_bin_cmd!("rhousekeep")
}

/// Create a unique test DB path inside the system temp dir and remove any
/// existing database and state file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rhousekeep.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{}.state.json", db_path)).ok();
    db_path
}

/// Initialize a test database through the CLI
pub fn init_test_db(db_path: &str) {
    rhk()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// In-memory store, in-memory ledger storage and a clock pinned at `now`.
pub fn test_ctx_at(now: &str) -> (AppContext, Rc<FixedClock>) {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("run migrations");

    let clock = Rc::new(FixedClock::new(ts(now)));
    let ctx = AppContext::from_parts(
        pool,
        Box::new(MemoryStorage::new()),
        clock.clone(),
        Config::with_database(":memory:".to_string()),
    );
    (ctx, clock)
}

pub fn test_ctx() -> (AppContext, Rc<FixedClock>) {
    test_ctx_at("2024-03-04T12:00:00Z")
}

/// A stored-shape chore, for tests that work below the logic layer.
pub fn chore(id: i64, name: &str, created_at: &str) -> Trackable {
    Trackable {
        id,
        kind: TrackableType::Chore,
        name: name.to_string(),
        description: None,
        recurrence: Recurrence::new(1, RecurrenceUnit::Weeks),
        created_at: ts(created_at),
        archived: false,
        last_completed: None,
        person_id: None,
        exercise_unit: None,
        target_amount: None,
        is_repeating: Some(true),
        days_until_due: None,
        next_due_date: None,
        previous_next_due_date: None,
    }
}

pub fn exercise(id: i64, name: &str, target: f64, every_days: u32, created_at: &str) -> Trackable {
    Trackable {
        kind: TrackableType::Exercise,
        recurrence: Recurrence::new(every_days, RecurrenceUnit::Days),
        target_amount: Some(target),
        is_repeating: None,
        ..chore(id, name, created_at)
    }
}
