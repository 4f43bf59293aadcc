//! Sync engine: change-ledger replay against a remote full snapshot.
//!
//! `Idle → FetchingRemote → Reconciling → Applying → Pushing → Clearing → Idle`;
//! any error moves the engine to `Failed`. Whatever was applied before a
//! failure stays applied: every step is id-stable, so retrying is safe.

use crate::context::AppContext;
use crate::core::snapshot::{
    ImportSummary, export_full, full_to_minimal, import_entities, import_full, minimal_equal,
};
use crate::db::queries::{completions as cq, expenses as xq, groceries as gq, trackables as tq};
use crate::errors::{AppError, AppResult};
use crate::models::change::{Change, ChangeType, EntityPayload, EntityType};
use crate::models::snapshot::{FullSnapshot, MinimalSnapshot, Snapshot};
use crate::remote::RemoteStore;
use crate::storage::LAST_SYNCED_KEY;
use crate::ui::messages::warning;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    FetchingRemote,
    Reconciling,
    Applying,
    Pushing,
    Clearing,
    Failed,
}

/// A ledger entry that could not be replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFailure {
    pub change_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub remote_id: String,
    pub imported: ImportSummary,
    pub replayed: usize,
    pub failures: Vec<ReplayFailure>,
    /// False when nothing changed on either side and the remote write was skipped.
    pub pushed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    pub remote_id: Option<String>,
    pub pending: usize,
    pub last_synced: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct SyncEngine {
    state: SyncState,
    trace: Vec<SyncState>,
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncEngine {
    pub fn new() -> Self {
        Self {
            state: SyncState::Idle,
            trace: vec![SyncState::Idle],
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Every state entered so far, in order.
    pub fn trace(&self) -> &[SyncState] {
        &self.trace
    }

    /// Run one sync round.
    ///
    /// 1. fetch the remote full snapshot (no remote id or a failed fetch is
    ///    fatal and nothing local changes);
    /// 2. import its entity collections wholesale;
    /// 3. replay the ledger on top, oldest change first, skipping (and
    ///    reporting) changes that fail;
    /// 4. push the merged state, unless the ledger was empty and the merged
    ///    state matches the remote one;
    /// 5. remember what was pushed and clear the ledger.
    pub fn sync(
        &mut self,
        ctx: &mut AppContext,
        remote: &mut dyn RemoteStore,
    ) -> AppResult<SyncReport> {
        let result = self.run(ctx, remote);
        match &result {
            Ok(report) => {
                self.enter(SyncState::Idle);
                ctx.log(
                    "sync",
                    &report.remote_id,
                    &format!(
                        "Replayed {} change(s), {} failed, remote {}",
                        report.replayed,
                        report.failures.len(),
                        if report.pushed { "updated" } else { "unchanged" }
                    ),
                );
            }
            Err(e) => {
                self.enter(SyncState::Failed);
                ctx.log("sync_failed", "", &e.to_string());
            }
        }
        result
    }

    fn run(&mut self, ctx: &mut AppContext, remote: &mut dyn RemoteStore) -> AppResult<SyncReport> {
        self.enter(SyncState::FetchingRemote);
        let remote_id = configured_remote(ctx)?;
        let fetched = remote.fetch(&remote_id)?;

        self.enter(SyncState::Reconciling);
        let full = require_full(fetched)?;
        let remote_minimal = full_to_minimal(&full);
        let changes = ctx.ledger.changes();

        // people and preferences are device settings: sync keeps the local ones
        self.enter(SyncState::Applying);
        let imported = import_entities(ctx, &full)?;
        let (replayed, failures) = replay_all(ctx, &changes)?;

        self.enter(SyncState::Pushing);
        let merged = export_full(ctx)?;
        let merged_minimal = full_to_minimal(&merged);
        let pushed = !changes.is_empty() || !minimal_equal(&merged_minimal, &remote_minimal);
        if pushed {
            remote.update(&remote_id, &Snapshot::Full(merged))?;
        }
        record_last_synced(ctx, &merged_minimal);

        self.enter(SyncState::Clearing);
        ctx.ledger.clear();

        Ok(SyncReport {
            remote_id,
            imported,
            replayed,
            failures,
            pushed,
        })
    }

    /// Push the whole local state, creating the remote object (and recording
    /// its id in the configuration) when none is configured yet. Pending
    /// changes are cleared on success.
    pub fn publish(
        &mut self,
        ctx: &mut AppContext,
        remote: &mut dyn RemoteStore,
    ) -> AppResult<String> {
        self.enter(SyncState::Pushing);
        let result = (|| {
            let full = export_full(ctx)?;
            let minimal = full_to_minimal(&full);
            let snapshot = Snapshot::Full(full);

            let id = match ctx.config.gist_id.clone().filter(|id| !id.trim().is_empty()) {
                Some(id) => {
                    remote.update(&id, &snapshot)?;
                    id
                }
                None => {
                    let id = remote.create(&snapshot)?;
                    ctx.config.gist_id = Some(id.clone());
                    ctx.save_config()?;
                    id
                }
            };

            record_last_synced(ctx, &minimal);
            // the remote now holds everything the ledger was waiting to push
            ctx.ledger.clear();
            Ok(id)
        })();

        self.finish(ctx, "publish", result)
    }

    /// Replace local state with the remote snapshot without pushing.
    /// Pending changes would be lost, so they must be discarded explicitly.
    pub fn pull(
        &mut self,
        ctx: &mut AppContext,
        remote: &mut dyn RemoteStore,
        discard_pending: bool,
    ) -> AppResult<ImportSummary> {
        self.enter(SyncState::FetchingRemote);
        let result = (|| {
            if ctx.ledger.has_changes() && !discard_pending {
                return Err(AppError::Other(format!(
                    "{} pending change(s) would be lost: run `sync` first or discard them",
                    ctx.ledger.count()
                )));
            }
            let remote_id = configured_remote(ctx)?;
            let full = require_full(remote.fetch(&remote_id)?)?;

            let summary = import_full(ctx, &full)?;
            record_last_synced(ctx, &full_to_minimal(&full));
            ctx.ledger.clear();
            Ok(summary)
        })();

        self.finish(ctx, "pull", result)
    }

    pub fn status(ctx: &AppContext) -> SyncStatus {
        SyncStatus {
            remote_id: ctx.config.has_remote().then(|| ctx.config.gist_id.clone()).flatten(),
            pending: ctx.ledger.count(),
            last_synced: last_synced_minimal(ctx).map(|m| m.updated_at),
        }
    }

    fn finish<T>(&mut self, ctx: &AppContext, operation: &str, result: AppResult<T>) -> AppResult<T> {
        match &result {
            Ok(_) => {
                self.enter(SyncState::Idle);
                ctx.log(operation, "remote", "Completed");
            }
            Err(e) => {
                self.enter(SyncState::Failed);
                ctx.log(&format!("{}_failed", operation), "remote", &e.to_string());
            }
        }
        result
    }

    fn enter(&mut self, state: SyncState) {
        self.state = state;
        self.trace.push(state);
    }
}

/// The minimal projection recorded by the last successful push or pull.
pub fn last_synced_minimal(ctx: &AppContext) -> Option<MinimalSnapshot> {
    match ctx.ledger.storage().get(LAST_SYNCED_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).ok(),
        Ok(None) => None,
        Err(e) => {
            warning(format!("Failed to read last synced snapshot: {}", e));
            None
        }
    }
}

fn record_last_synced(ctx: &mut AppContext, minimal: &MinimalSnapshot) {
    let result = serde_json::to_string(minimal)
        .map_err(AppError::from)
        .and_then(|json| ctx.ledger.storage_mut().set(LAST_SYNCED_KEY, &json));
    if let Err(e) = result {
        warning(format!("Failed to record last synced snapshot: {}", e));
    }
}

fn configured_remote(ctx: &AppContext) -> AppResult<String> {
    ctx.config
        .gist_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or(AppError::SyncNoRemote)
}

fn require_full(snapshot: Snapshot) -> AppResult<FullSnapshot> {
    match snapshot {
        Snapshot::Full(full) => Ok(full),
        Snapshot::Minimal(_) => Err(AppError::Snapshot(
            "remote holds only a minimal snapshot; publish a full one first".into(),
        )),
    }
}

/// Position of a change in the replay: trackables must exist before their
/// completions are written and outlive them until those are deleted.
fn replay_phase(change: &Change) -> u8 {
    match (change.entity_type, change.change_type) {
        (EntityType::Trackable, ChangeType::Add | ChangeType::Update) => 0,
        (EntityType::Trackable, ChangeType::Delete) => 2,
        _ => 1,
    }
}

/// Changes in replay order: by phase, then oldest first.
pub fn replay_order(changes: &[Change]) -> Vec<&Change> {
    let mut ordered: Vec<&Change> = changes.iter().collect();
    ordered.sort_by_key(|c| (replay_phase(c), c.timestamp));
    ordered
}

/// Replay every change; per-change failures are collected, not returned.
/// Afterwards the cached `last_completed` of every touched trackable is
/// re-derived from its completions.
fn replay_all(ctx: &mut AppContext, changes: &[Change]) -> AppResult<(usize, Vec<ReplayFailure>)> {
    let mut replayed = 0;
    let mut failures = Vec::new();
    let mut touched = BTreeSet::new();

    for change in replay_order(changes) {
        match replay(ctx, change) {
            Ok(trackable_id) => {
                replayed += 1;
                touched.extend(trackable_id);
            }
            Err(e) => {
                warning(format!("Skipped pending change {}: {}", change.id, e));
                ctx.log("sync_skip", &change.id, &e.to_string());
                failures.push(ReplayFailure {
                    change_id: change.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    for id in touched {
        if let Some(mut t) = tq::get_trackable(&ctx.pool.conn, id)? {
            let latest = cq::latest_for_trackable(&ctx.pool.conn, id)?.map(|c| c.completed_at);
            if t.last_completed != latest {
                t.last_completed = latest;
                tq::update_trackable(&ctx.pool.conn, &t)?;
            }
        }
    }

    Ok((replayed, failures))
}

/// Apply one change to the entity store. Returns the trackable whose
/// completion cache may need refreshing.
fn replay(ctx: &mut AppContext, change: &Change) -> AppResult<Option<i64>> {
    let conn = &mut ctx.pool.conn;

    match change.change_type {
        ChangeType::Delete => match change.entity_type {
            EntityType::Trackable => {
                tq::delete_trackable_cascade(conn, change.entity_id)?;
                Ok(None)
            }
            EntityType::Completion => {
                let owner = cq::get_completion(conn, change.entity_id)?.map(|c| c.trackable_id);
                cq::delete_completion(conn, change.entity_id)?;
                Ok(owner)
            }
            EntityType::Grocery => {
                gq::delete_grocery(conn, change.entity_id)?;
                Ok(None)
            }
            EntityType::Expense => {
                xq::delete_expense(conn, change.entity_id)?;
                Ok(None)
            }
        },
        ChangeType::Add | ChangeType::Update => {
            let payload = change.data.as_ref().ok_or_else(|| {
                AppError::Snapshot(format!("{} change {} has no payload", change.change_type.as_str(), change.id))
            })?;
            match payload {
                EntityPayload::Trackable(t) => {
                    tq::upsert_trackable(conn, t)?;
                    Ok(Some(t.id))
                }
                EntityPayload::Completion(c) => {
                    if tq::get_trackable(conn, c.trackable_id)?.is_none() {
                        return Err(AppError::NotFound {
                            entity: "Trackable",
                            id: c.trackable_id,
                        });
                    }
                    cq::upsert_completion(conn, c)?;
                    Ok(Some(c.trackable_id))
                }
                EntityPayload::Grocery(g) => {
                    gq::upsert_grocery(conn, g)?;
                    Ok(None)
                }
                EntityPayload::Expense(e) => {
                    xq::upsert_expense(conn, e)?;
                    Ok(None)
                }
            }
        }
    }
}
