use super::{collect_rows, invalid_text, opt_ts_from_db, opt_ts_to_db, ts_from_db, ts_to_db};
use crate::errors::AppResult;
use crate::models::trackable::{ExerciseUnit, Recurrence, RecurrenceUnit, Trackable, TrackableType};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, type, name, description, recurrence_every, recurrence_unit, \
     created_at, archived, last_completed, person_id, exercise_unit, target_amount, \
     is_repeating, days_until_due, next_due_date, previous_next_due_date";

pub fn map_trackable(row: &Row) -> rusqlite::Result<Trackable> {
    let kind_str: String = row.get("type")?;
    let kind = TrackableType::from_db_str(&kind_str).ok_or_else(|| invalid_text("type", &kind_str))?;

    let unit_str: String = row.get("recurrence_unit")?;
    let unit = RecurrenceUnit::from_db_str(&unit_str)
        .ok_or_else(|| invalid_text("recurrence unit", &unit_str))?;

    let exercise_unit = match row.get::<_, Option<String>>("exercise_unit")? {
        Some(s) => Some(ExerciseUnit::from_db_str(&s).ok_or_else(|| invalid_text("exercise unit", &s))?),
        None => None,
    };

    Ok(Trackable {
        id: row.get("id")?,
        kind,
        name: row.get("name")?,
        description: row.get("description")?,
        recurrence: Recurrence::new(row.get("recurrence_every")?, unit),
        created_at: ts_from_db(row.get("created_at")?)?,
        archived: row.get::<_, i64>("archived")? == 1,
        last_completed: opt_ts_from_db(row.get("last_completed")?)?,
        person_id: row.get("person_id")?,
        exercise_unit,
        target_amount: row.get("target_amount")?,
        is_repeating: row.get::<_, Option<i64>>("is_repeating")?.map(|v| v == 1),
        days_until_due: row.get("days_until_due")?,
        next_due_date: opt_ts_from_db(row.get("next_due_date")?)?,
        previous_next_due_date: opt_ts_from_db(row.get("previous_next_due_date")?)?,
    })
}

pub fn get_trackable(conn: &Connection, id: i64) -> AppResult<Option<Trackable>> {
    let sql = format!("SELECT {} FROM trackables WHERE id = ?1", COLUMNS);
    let t = conn.query_row(&sql, [id], map_trackable).optional()?;
    Ok(t)
}

pub fn list_trackables(conn: &Connection) -> AppResult<Vec<Trackable>> {
    let sql = format!("SELECT {} FROM trackables ORDER BY id ASC", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_trackable)?;
    Ok(collect_rows(rows)?)
}

/// Trackables of one type (uses the `type` index).
pub fn list_by_type(
    conn: &Connection,
    kind: TrackableType,
    include_archived: bool,
) -> AppResult<Vec<Trackable>> {
    let sql = if include_archived {
        format!("SELECT {} FROM trackables WHERE type = ?1 ORDER BY id ASC", COLUMNS)
    } else {
        format!(
            "SELECT {} FROM trackables WHERE type = ?1 AND archived = 0 ORDER BY id ASC",
            COLUMNS
        )
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([kind.to_db_str()], map_trackable)?;
    Ok(collect_rows(rows)?)
}

/// Insert with an auto-assigned id; `t.id` is ignored. Returns the new id.
pub fn insert_trackable(conn: &Connection, t: &Trackable) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO trackables (type, name, description, recurrence_every, recurrence_unit,
            created_at, archived, last_completed, person_id, exercise_unit, target_amount,
            is_repeating, days_until_due, next_due_date, previous_next_due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            t.kind.to_db_str(),
            t.name,
            t.description,
            t.recurrence.every,
            t.recurrence.unit.to_db_str(),
            ts_to_db(&t.created_at),
            t.archived as i64,
            opt_ts_to_db(&t.last_completed),
            t.person_id,
            t.exercise_unit.map(|u| u.to_db_str()),
            t.target_amount,
            t.is_repeating.map(|b| b as i64),
            t.days_until_due,
            opt_ts_to_db(&t.next_due_date),
            opt_ts_to_db(&t.previous_next_due_date),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert or overwrite, keeping the caller-supplied id.
pub fn upsert_trackable(conn: &Connection, t: &Trackable) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO trackables (id, type, name, description, recurrence_every,
            recurrence_unit, created_at, archived, last_completed, person_id, exercise_unit,
            target_amount, is_repeating, days_until_due, next_due_date, previous_next_due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            t.id,
            t.kind.to_db_str(),
            t.name,
            t.description,
            t.recurrence.every,
            t.recurrence.unit.to_db_str(),
            ts_to_db(&t.created_at),
            t.archived as i64,
            opt_ts_to_db(&t.last_completed),
            t.person_id,
            t.exercise_unit.map(|u| u.to_db_str()),
            t.target_amount,
            t.is_repeating.map(|b| b as i64),
            t.days_until_due,
            opt_ts_to_db(&t.next_due_date),
            opt_ts_to_db(&t.previous_next_due_date),
        ],
    )?;
    Ok(())
}

/// Overwrite every column of an existing row. Returns the number of rows touched.
pub fn update_trackable(conn: &Connection, t: &Trackable) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE trackables
         SET type = ?1, name = ?2, description = ?3, recurrence_every = ?4,
             recurrence_unit = ?5, created_at = ?6, archived = ?7, last_completed = ?8,
             person_id = ?9, exercise_unit = ?10, target_amount = ?11, is_repeating = ?12,
             days_until_due = ?13, next_due_date = ?14, previous_next_due_date = ?15
         WHERE id = ?16",
        params![
            t.kind.to_db_str(),
            t.name,
            t.description,
            t.recurrence.every,
            t.recurrence.unit.to_db_str(),
            ts_to_db(&t.created_at),
            t.archived as i64,
            opt_ts_to_db(&t.last_completed),
            t.person_id,
            t.exercise_unit.map(|u| u.to_db_str()),
            t.target_amount,
            t.is_repeating.map(|b| b as i64),
            t.days_until_due,
            opt_ts_to_db(&t.next_due_date),
            opt_ts_to_db(&t.previous_next_due_date),
            t.id,
        ],
    )?;
    Ok(n)
}

/// Delete a trackable and all of its completions in one transaction.
/// Returns the ids of the removed completions.
pub fn delete_trackable_cascade(conn: &mut Connection, id: i64) -> AppResult<Vec<i64>> {
    let tx = conn.transaction()?;

    let removed = {
        let mut stmt = tx.prepare("SELECT id FROM completions WHERE trackable_id = ?1")?;
        let rows = stmt.query_map([id], |row| row.get::<_, i64>(0))?;
        collect_rows(rows)?
    };

    tx.execute("DELETE FROM completions WHERE trackable_id = ?1", [id])?;
    tx.execute("DELETE FROM trackables WHERE id = ?1", [id])?;
    tx.commit()?;

    Ok(removed)
}

/// Remove every row. Used by wholesale snapshot import.
pub fn clear_trackables(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM trackables", [])?)
}
