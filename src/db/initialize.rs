use crate::db::migrate::{applied_versions, run_pending_migrations};
use crate::errors::AppResult;
use rusqlite::Connection;

/// Bring a database (new or old) up to the current schema.
///
/// Tables are only ever created by migrations. Returns how many
/// migrations this call applied.
pub fn init_db(conn: &Connection) -> AppResult<usize> {
    let before = applied_versions(conn)?.len();
    run_pending_migrations(conn)?;
    let after = applied_versions(conn)?.len();
    Ok(after.saturating_sub(before))
}
