use super::{collect_rows, ts_from_db, ts_to_db};
use crate::errors::AppResult;
use crate::models::completion::Completion;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, trackable_id, completed_at, notes, amount";

pub fn map_completion(row: &Row) -> rusqlite::Result<Completion> {
    Ok(Completion {
        id: row.get("id")?,
        trackable_id: row.get("trackable_id")?,
        completed_at: ts_from_db(row.get("completed_at")?)?,
        notes: row.get("notes")?,
        amount: row.get("amount")?,
    })
}

pub fn get_completion(conn: &Connection, id: i64) -> AppResult<Option<Completion>> {
    let sql = format!("SELECT {} FROM completions WHERE id = ?1", COLUMNS);
    Ok(conn.query_row(&sql, [id], map_completion).optional()?)
}

pub fn list_completions(conn: &Connection) -> AppResult<Vec<Completion>> {
    let sql = format!("SELECT {} FROM completions ORDER BY id ASC", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_completion)?;
    Ok(collect_rows(rows)?)
}

/// Completions of one trackable, newest first.
pub fn for_trackable(conn: &Connection, trackable_id: i64) -> AppResult<Vec<Completion>> {
    let sql = format!(
        "SELECT {} FROM completions WHERE trackable_id = ?1
         ORDER BY completed_at DESC, id DESC",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([trackable_id], map_completion)?;
    Ok(collect_rows(rows)?)
}

pub fn latest_for_trackable(conn: &Connection, trackable_id: i64) -> AppResult<Option<Completion>> {
    let sql = format!(
        "SELECT {} FROM completions WHERE trackable_id = ?1
         ORDER BY completed_at DESC, id DESC LIMIT 1",
        COLUMNS
    );
    Ok(conn.query_row(&sql, [trackable_id], map_completion).optional()?)
}

pub fn insert_completion(conn: &Connection, c: &Completion) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO completions (trackable_id, completed_at, notes, amount)
         VALUES (?1, ?2, ?3, ?4)",
        params![c.trackable_id, ts_to_db(&c.completed_at), c.notes, c.amount],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn upsert_completion(conn: &Connection, c: &Completion) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO completions (id, trackable_id, completed_at, notes, amount)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![c.id, c.trackable_id, ts_to_db(&c.completed_at), c.notes, c.amount],
    )?;
    Ok(())
}

pub fn delete_completion(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM completions WHERE id = ?1", [id])?)
}

/// Remove every row. Used by wholesale snapshot import.
pub fn clear_completions(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM completions", [])?)
}
