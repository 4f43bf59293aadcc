use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Row counts of the entity tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DbCounts {
    pub chores: i64,
    pub exercises: i64,
    pub archived: i64,
    pub completions: i64,
    pub groceries: i64,
    pub expenses: i64,
}

fn count(pool: &DbPool, sql: &str) -> rusqlite::Result<i64> {
    pool.conn.query_row(sql, [], |row| row.get(0))
}

pub fn counts(pool: &DbPool) -> rusqlite::Result<DbCounts> {
    Ok(DbCounts {
        chores: count(pool, "SELECT COUNT(*) FROM trackables WHERE type = 'chore'")?,
        exercises: count(pool, "SELECT COUNT(*) FROM trackables WHERE type = 'exercise'")?,
        archived: count(pool, "SELECT COUNT(*) FROM trackables WHERE archived = 1")?,
        completions: count(pool, "SELECT COUNT(*) FROM completions")?,
        groceries: count(pool, "SELECT COUNT(*) FROM groceries")?,
        expenses: count(pool, "SELECT COUNT(*) FROM expenses")?,
    })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let c = counts(pool)?;
    println!(
        "{}• Trackables:{} {}{}{} chores, {}{}{} exercises ({} archived)",
        CYAN, RESET, GREEN, c.chores, RESET, GREEN, c.exercises, RESET, c.archived
    );
    println!("{}• Completions:{} {}{}{}", CYAN, RESET, GREEN, c.completions, RESET);
    println!("{}• Grocery items:{} {}{}{}", CYAN, RESET, GREEN, c.groceries, RESET);
    println!("{}• Expenses:{} {}{}{}", CYAN, RESET, GREEN, c.expenses, RESET);

    //
    // 3) COMPLETION RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT completed_at FROM completions ORDER BY completed_at ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT completed_at FROM completions ORDER BY completed_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let show = |v: Option<String>| v.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    println!("{}• Completions range:{}", CYAN, RESET);
    println!("    from: {}", show(first));
    println!("    to:   {}", show(last));

    //
    // 4) LAST MIGRATION
    //
    let migration: Option<String> = pool
        .conn
        .query_row(
            "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    println!("{}• Schema version:{} {}", CYAN, RESET, show(migration));

    println!();
    Ok(())
}

/// `PRAGMA integrity_check` problems; empty when the file is sound.
pub fn integrity_problems(pool: &DbPool) -> rusqlite::Result<Vec<String>> {
    let mut stmt = pool.conn.prepare("PRAGMA integrity_check")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let lines = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(lines.into_iter().filter(|l| l != "ok").collect())
}

/// Rebuild the file and return its size in bytes before and after.
pub fn vacuum(pool: &DbPool, db_path: &str) -> rusqlite::Result<(u64, u64)> {
    let size = || fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let before = size();
    pool.conn.execute_batch("VACUUM;")?;
    Ok((before, size()))
}
