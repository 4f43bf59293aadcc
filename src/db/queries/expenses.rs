use super::{collect_rows, ts_from_db, ts_to_db};
use crate::errors::AppResult;
use crate::models::expense::Expense;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, name, description, cost, sort_order, completed, created_at";

pub fn map_expense(row: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        cost: row.get("cost")?,
        order: row.get("sort_order")?,
        completed: row.get::<_, i64>("completed")? == 1,
        created_at: ts_from_db(row.get("created_at")?)?,
    })
}

pub fn get_expense(conn: &Connection, id: i64) -> AppResult<Option<Expense>> {
    let sql = format!("SELECT {} FROM expenses WHERE id = ?1", COLUMNS);
    Ok(conn.query_row(&sql, [id], map_expense).optional()?)
}

pub fn list_expenses(conn: &Connection) -> AppResult<Vec<Expense>> {
    let sql = format!("SELECT {} FROM expenses ORDER BY sort_order ASC, id ASC", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_expense)?;
    Ok(collect_rows(rows)?)
}

pub fn max_order(conn: &Connection) -> AppResult<Option<i64>> {
    Ok(conn.query_row("SELECT MAX(sort_order) FROM expenses", [], |row| row.get(0))?)
}

pub fn insert_expense(conn: &Connection, e: &Expense) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO expenses (name, description, cost, sort_order, completed, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            e.name,
            e.description,
            e.cost,
            e.order,
            e.completed as i64,
            ts_to_db(&e.created_at)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn upsert_expense(conn: &Connection, e: &Expense) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO expenses (id, name, description, cost, sort_order, completed, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            e.id,
            e.name,
            e.description,
            e.cost,
            e.order,
            e.completed as i64,
            ts_to_db(&e.created_at)
        ],
    )?;
    Ok(())
}

pub fn update_expense(conn: &Connection, e: &Expense) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE expenses
         SET name = ?1, description = ?2, cost = ?3, sort_order = ?4, completed = ?5, created_at = ?6
         WHERE id = ?7",
        params![
            e.name,
            e.description,
            e.cost,
            e.order,
            e.completed as i64,
            ts_to_db(&e.created_at),
            e.id
        ],
    )?)
}

pub fn delete_expense(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?)
}

/// Remove every row. Used by wholesale snapshot import.
pub fn clear_expenses(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM expenses", [])?)
}
