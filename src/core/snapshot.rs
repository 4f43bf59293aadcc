//! Snapshot codec: local state to and from the remote wire format.

use crate::context::AppContext;
use crate::db::queries::{completions as cq, expenses as xq, groceries as gq, trackables as tq};
use crate::errors::{AppError, AppResult};
use crate::models::snapshot::{
    FullData, FullSnapshot, MinimalEntry, MinimalSnapshot, Preferences, Snapshot,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Counts of what an import wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub trackables: usize,
    pub completions: usize,
    pub groceries: usize,
    pub expenses: usize,
}

/// The whole local state as a version 1 snapshot stamped with the current time.
pub fn export_full(ctx: &AppContext) -> AppResult<FullSnapshot> {
    let conn = &ctx.pool.conn;
    let data = FullData {
        trackables: tq::list_trackables(conn)?,
        completions: cq::list_completions(conn)?,
        groceries: gq::list_groceries(conn)?,
        expenses: xq::list_expenses(conn)?,
        people: Some(ctx.config.people.clone()),
        preferences: Some(Preferences {
            currency: ctx.config.currency.clone(),
            budget: ctx.config.budget,
        }),
    };
    Ok(FullSnapshot::new(ctx.now(), data))
}

/// Replace every local collection with the snapshot's, keeping its ids,
/// and adopt the people and preferences it carries.
///
/// The entity collections are swapped in one transaction. The change
/// ledger is not touched.
pub fn import_full(ctx: &mut AppContext, snapshot: &FullSnapshot) -> AppResult<ImportSummary> {
    let summary = import_entities(ctx, snapshot)?;

    let data = &snapshot.data;
    let mut config_changed = false;
    if let Some(people) = &data.people
        && !people.is_empty()
    {
        ctx.config.people = people.clone();
        config_changed = true;
    }
    if let Some(prefs) = &data.preferences {
        ctx.config.currency = prefs.currency.clone();
        ctx.config.budget = prefs.budget;
        config_changed = true;
    }
    if config_changed {
        ctx.save_config()?;
    }

    Ok(summary)
}

/// Wholesale replace of the entity collections only. People and
/// preferences stay as configured on this device.
pub fn import_entities(ctx: &mut AppContext, snapshot: &FullSnapshot) -> AppResult<ImportSummary> {
    let data = &snapshot.data;

    let tx = ctx.pool.conn.transaction()?;
    cq::clear_completions(&tx)?;
    tq::clear_trackables(&tx)?;
    gq::clear_groceries(&tx)?;
    xq::clear_expenses(&tx)?;

    for t in &data.trackables {
        tq::upsert_trackable(&tx, t)?;
    }
    for c in &data.completions {
        cq::upsert_completion(&tx, c)?;
    }
    for g in &data.groceries {
        gq::upsert_grocery(&tx, g)?;
    }
    for e in &data.expenses {
        xq::upsert_expense(&tx, e)?;
    }
    tx.commit()?;

    let summary = ImportSummary {
        trackables: data.trackables.len(),
        completions: data.completions.len(),
        groceries: data.groceries.len(),
        expenses: data.expenses.len(),
    };
    ctx.log(
        "import",
        "snapshot",
        &format!(
            "Imported {} trackable(s), {} completion(s), {} grocery item(s), {} expense(s)",
            summary.trackables, summary.completions, summary.groceries, summary.expenses
        ),
    );

    Ok(summary)
}

/// Project any snapshot to its minimal form. A minimal snapshot is returned
/// as is; a full one keeps, per trackable, the newest completion time.
pub fn to_minimal(snapshot: &Snapshot) -> MinimalSnapshot {
    match snapshot {
        Snapshot::Minimal(m) => m.clone(),
        Snapshot::Full(full) => full_to_minimal(full),
    }
}

pub fn full_to_minimal(full: &FullSnapshot) -> MinimalSnapshot {
    let mut latest: HashMap<i64, DateTime<Utc>> = HashMap::new();
    for c in &full.data.completions {
        latest
            .entry(c.trackable_id)
            .and_modify(|at| *at = (*at).max(c.completed_at))
            .or_insert(c.completed_at);
    }

    let entries = full
        .data
        .trackables
        .iter()
        .map(|t| MinimalEntry {
            id: t.id,
            last_completed: latest.get(&t.id).copied(),
            archived: t.archived,
        })
        .collect();

    MinimalSnapshot::new(full.updated_at, entries)
}

/// Same trackable ids with the same last completion times, in any order.
pub fn minimal_equal(a: &MinimalSnapshot, b: &MinimalSnapshot) -> bool {
    if a.data.trackables.len() != b.data.trackables.len() {
        return false;
    }

    let sorted = |m: &MinimalSnapshot| {
        let mut v: Vec<(i64, Option<DateTime<Utc>>)> = m
            .data
            .trackables
            .iter()
            .map(|e| (e.id, e.last_completed))
            .collect();
        v.sort_by_key(|(id, _)| *id);
        v
    };

    sorted(a) == sorted(b)
}

/// Decode a snapshot of either version.
pub fn parse_snapshot(json: &str) -> AppResult<Snapshot> {
    serde_json::from_str(json).map_err(|e| AppError::Snapshot(e.to_string()))
}
