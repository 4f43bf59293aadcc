//! Versioned schema migrations.
//!
//! Each migration runs once, inside its own transaction, and is recorded in
//! the `log` table as `migration_applied` with its version as target.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

type MigrationFn = fn(&Connection) -> Result<()>;

struct Migration {
    version: &'static str,
    description: &'static str,
    apply: MigrationFn,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240105_0001_create_trackables",
        description: "Created trackables and completions tables",
        apply: create_trackables,
    },
    Migration {
        version: "20240118_0002_exercise_fields",
        description: "Added exercise owner, unit, target and completion amount",
        apply: add_exercise_fields,
    },
    Migration {
        version: "20240126_0003_create_groceries",
        description: "Created groceries table",
        apply: create_groceries,
    },
    Migration {
        version: "20240214_0004_chore_scheduling",
        description: "Added one-time chores and cached due dates",
        apply: add_chore_scheduling,
    },
    Migration {
        version: "20240302_0005_create_expenses",
        description: "Created expenses table",
        apply: create_expenses,
    },
    Migration {
        version: "20240320_0006_manual_ordering",
        description: "Added manual ordering to groceries and expenses",
        apply: add_manual_ordering,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn create_trackables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS trackables (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            type              TEXT NOT NULL CHECK(type IN ('chore','exercise')),
            name              TEXT NOT NULL,
            description       TEXT,
            recurrence_every  INTEGER NOT NULL DEFAULT 1,
            recurrence_unit   TEXT NOT NULL DEFAULT 'weeks'
                              CHECK(recurrence_unit IN ('days','weeks','months')),
            created_at        TEXT NOT NULL,
            archived          INTEGER NOT NULL DEFAULT 0,
            last_completed    TEXT
        );

        CREATE TABLE IF NOT EXISTS completions (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            trackable_id  INTEGER NOT NULL,
            completed_at  TEXT NOT NULL,
            notes         TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_trackables_type ON trackables(type);
        CREATE INDEX IF NOT EXISTS idx_completions_trackable
            ON completions(trackable_id, completed_at);
        "#,
    )
}

fn add_exercise_fields(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        ALTER TABLE trackables ADD COLUMN person_id TEXT;
        ALTER TABLE trackables ADD COLUMN exercise_unit TEXT;
        ALTER TABLE trackables ADD COLUMN target_amount REAL;
        ALTER TABLE completions ADD COLUMN amount REAL;
        "#,
    )
}

fn create_groceries(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS groceries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            quantity    TEXT,
            category    TEXT,
            checked     INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_groceries_checked ON groceries(checked);
        "#,
    )
}

fn add_chore_scheduling(conn: &Connection) -> Result<()> {
    // is_repeating stays NULL for existing rows: they keep repeating
    conn.execute_batch(
        r#"
        ALTER TABLE trackables ADD COLUMN is_repeating INTEGER;
        ALTER TABLE trackables ADD COLUMN days_until_due INTEGER;
        ALTER TABLE trackables ADD COLUMN next_due_date TEXT;
        ALTER TABLE trackables ADD COLUMN previous_next_due_date TEXT;
        "#,
    )
}

fn create_expenses(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            description  TEXT,
            cost         REAL NOT NULL DEFAULT 0,
            completed    INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );
        "#,
    )
}

/// Add `sort_order` and backfill it from creation order, so that items
/// added later (at `max + 1`) keep landing at the end.
fn add_manual_ordering(conn: &Connection) -> Result<()> {
    for table in ["groceries", "expenses"] {
        conn.execute_batch(&format!(
            r#"
            ALTER TABLE {t} ADD COLUMN sort_order INTEGER NOT NULL DEFAULT 0;

            UPDATE {t} SET sort_order = (
                SELECT COUNT(*) FROM {t} AS older
                WHERE older.created_at < {t}.created_at
                   OR (older.created_at = {t}.created_at AND older.id < {t}.id)
            );
            "#,
            t = table
        ))?;
    }
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        (m.apply)(&tx).map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, 'migration_applied', ?2, ?3)",
            rusqlite::params![chrono::Local::now().to_rfc3339(), m.version, m.description],
        )?;
        tx.commit()?;

        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}

/// Versions already recorded in the log table, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn latest_version() -> &'static str {
    MIGRATIONS.last().map(|m| m.version).unwrap_or("")
}
