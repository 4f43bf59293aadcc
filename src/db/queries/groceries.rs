use super::{collect_rows, ts_from_db, ts_to_db};
use crate::errors::AppResult;
use crate::models::grocery::GroceryItem;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, name, quantity, category, checked, created_at, sort_order";

pub fn map_grocery(row: &Row) -> rusqlite::Result<GroceryItem> {
    Ok(GroceryItem {
        id: row.get("id")?,
        name: row.get("name")?,
        quantity: row.get("quantity")?,
        category: row.get("category")?,
        checked: row.get::<_, i64>("checked")? == 1,
        created_at: ts_from_db(row.get("created_at")?)?,
        order: row.get("sort_order")?,
    })
}

pub fn get_grocery(conn: &Connection, id: i64) -> AppResult<Option<GroceryItem>> {
    let sql = format!("SELECT {} FROM groceries WHERE id = ?1", COLUMNS);
    Ok(conn.query_row(&sql, [id], map_grocery).optional()?)
}

/// All items by display order.
pub fn list_groceries(conn: &Connection) -> AppResult<Vec<GroceryItem>> {
    let sql = format!("SELECT {} FROM groceries ORDER BY sort_order ASC, id ASC", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_grocery)?;
    Ok(collect_rows(rows)?)
}

pub fn max_order(conn: &Connection) -> AppResult<Option<i64>> {
    Ok(conn.query_row("SELECT MAX(sort_order) FROM groceries", [], |row| row.get(0))?)
}

pub fn insert_grocery(conn: &Connection, g: &GroceryItem) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO groceries (name, quantity, category, checked, created_at, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            g.name,
            g.quantity,
            g.category,
            g.checked as i64,
            ts_to_db(&g.created_at),
            g.order
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn upsert_grocery(conn: &Connection, g: &GroceryItem) -> AppResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO groceries (id, name, quantity, category, checked, created_at, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            g.id,
            g.name,
            g.quantity,
            g.category,
            g.checked as i64,
            ts_to_db(&g.created_at),
            g.order
        ],
    )?;
    Ok(())
}

pub fn update_grocery(conn: &Connection, g: &GroceryItem) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE groceries
         SET name = ?1, quantity = ?2, category = ?3, checked = ?4, created_at = ?5, sort_order = ?6
         WHERE id = ?7",
        params![
            g.name,
            g.quantity,
            g.category,
            g.checked as i64,
            ts_to_db(&g.created_at),
            g.order,
            g.id
        ],
    )?)
}

pub fn delete_grocery(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM groceries WHERE id = ?1", [id])?)
}

/// Remove every row. Used by wholesale snapshot import.
pub fn clear_groceries(conn: &Connection) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM groceries", [])?)
}
