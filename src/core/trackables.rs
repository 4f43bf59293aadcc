//! Chores and exercises: creation, completion, undo and the display load.
//!
//! Every mutation goes to the entity store first and is then recorded in
//! the change ledger with the entity as stored.

use crate::context::AppContext;
use crate::core::recurrence::{debt_for, next_due, remaining_allowed};
use crate::core::status::{compute_status, sort_for_display};
use crate::db::queries::{completions as cq, trackables as tq};
use crate::errors::{AppError, AppResult};
use crate::models::change::{EntityPayload, EntityType};
use crate::models::completion::Completion;
use crate::models::status::TrackableStatus;
use crate::models::trackable::{NewTrackable, Trackable, TrackablePatch, TrackableType};
use crate::utils::date::{add_days, end_of_local_day, local_day, same_local_day};
use chrono::{DateTime, Duration, Utc};

/// Result of a completion request. Only `Recorded` and `Capped` write anything.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    Recorded { id: i64, amount: f64 },
    /// The requested amount exceeded the advance ceiling and was reduced.
    Capped { id: i64, requested: f64, amount: f64 },
    /// The exercise already holds the current period plus one period in advance.
    QuotaReached,
    /// Repeating chores take one completion per calendar day.
    AlreadyCompletedOnDay,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    Removed {
        completion_id: i64,
        last_completed: Option<DateTime<Utc>>,
    },
    /// The latest completion is not from today and the trackable is not one-time.
    NotToday,
    NothingToUndo,
}

impl CompletionOutcome {
    pub fn completion_id(&self) -> Option<i64> {
        match self {
            CompletionOutcome::Recorded { id, .. } | CompletionOutcome::Capped { id, .. } => {
                Some(*id)
            }
            _ => None,
        }
    }
}

/// High-level business logic for chores and exercises.
pub struct TrackableLogic;

impl TrackableLogic {
    pub fn get(ctx: &AppContext, id: i64) -> AppResult<Trackable> {
        tq::get_trackable(&ctx.pool.conn, id)?.ok_or(AppError::NotFound {
            entity: "Trackable",
            id,
        })
    }

    pub fn add(ctx: &mut AppContext, new: NewTrackable) -> AppResult<Trackable> {
        if new.name.trim().is_empty() {
            return Err(AppError::Other("Name cannot be empty".into()));
        }
        if let Some(target) = new.target_amount
            && target < 0.0
        {
            return Err(AppError::InvalidAmount(target.to_string()));
        }

        let now = ctx.now();
        let mut t = Trackable {
            id: 0,
            kind: new.kind,
            name: new.name.trim().to_string(),
            description: new.description,
            recurrence: new.recurrence,
            created_at: now,
            archived: false,
            last_completed: None,
            person_id: new.person_id,
            exercise_unit: new.exercise_unit,
            target_amount: new.target_amount,
            is_repeating: new.is_repeating,
            days_until_due: new.days_until_due,
            next_due_date: new.next_due_date,
            previous_next_due_date: None,
        };

        if t.is_chore() {
            let repeating = *t.is_repeating.get_or_insert(false);
            if t.next_due_date.is_none() {
                t.next_due_date = Some(match t.days_until_due {
                    Some(days) => add_days(now, days),
                    None if repeating => next_due(now, &t.recurrence),
                    None => now,
                });
            }
        }

        t.id = tq::insert_trackable(&ctx.pool.conn, &t)?;
        ctx.ledger.track_add(EntityPayload::Trackable(t.clone()));
        ctx.log(
            "add",
            &format!("{} #{}", t.kind.to_db_str(), t.id),
            &format!("Added '{}' ({})", t.name, t.recurrence),
        );

        Ok(t)
    }

    pub fn update(ctx: &mut AppContext, id: i64, patch: &TrackablePatch) -> AppResult<Trackable> {
        let mut t = Self::get(ctx, id)?;
        if patch.is_empty() {
            return Ok(t);
        }
        patch.apply(&mut t);
        Self::store(ctx, &t)?;
        ctx.log("edit", &format!("trackable #{}", id), &format!("Edited '{}'", t.name));
        Ok(t)
    }

    /// Override the chore's due date. The previous one is kept for undo.
    pub fn reschedule(ctx: &mut AppContext, id: i64, due: DateTime<Utc>) -> AppResult<Trackable> {
        let mut t = Self::get(ctx, id)?;
        t.previous_next_due_date = t.next_due_date;
        t.next_due_date = Some(due);
        Self::store(ctx, &t)?;
        ctx.log(
            "reschedule",
            &format!("trackable #{}", id),
            &format!("Next due set to {}", due.to_rfc3339()),
        );
        Ok(t)
    }

    pub fn set_archived(ctx: &mut AppContext, id: i64, archived: bool) -> AppResult<Trackable> {
        let mut t = Self::get(ctx, id)?;
        if t.archived == archived {
            return Ok(t);
        }
        t.archived = archived;
        Self::store(ctx, &t)?;
        ctx.log(
            if archived { "archive" } else { "unarchive" },
            &format!("trackable #{}", id),
            &t.name,
        );
        Ok(t)
    }

    /// Delete a trackable with all of its completions. Returns how many
    /// completions went with it.
    pub fn delete(ctx: &mut AppContext, id: i64) -> AppResult<usize> {
        let t = Self::get(ctx, id)?;
        let removed = tq::delete_trackable_cascade(&mut ctx.pool.conn, id)?;

        for cid in &removed {
            ctx.ledger.track_delete(EntityType::Completion, *cid);
        }
        ctx.ledger.track_delete(EntityType::Trackable, id);
        ctx.log(
            "del",
            &format!("trackable #{}", id),
            &format!("Deleted '{}' and {} completion(s)", t.name, removed.len()),
        );

        Ok(removed.len())
    }

    /// Record a completion now.
    pub fn mark_complete(
        ctx: &mut AppContext,
        id: i64,
        notes: Option<String>,
        amount: Option<f64>,
    ) -> AppResult<CompletionOutcome> {
        let now = ctx.now();
        Self::record(ctx, id, now, notes, amount)
    }

    /// Record a completion at the last millisecond of the local day
    /// `days_ago` days before today.
    pub fn mark_complete_past(
        ctx: &mut AppContext,
        id: i64,
        days_ago: u32,
        amount: Option<f64>,
    ) -> AppResult<CompletionOutcome> {
        let day = local_day(add_days(ctx.now(), -(days_ago as i64)));
        let at = end_of_local_day(day);
        Self::record(ctx, id, at, None, amount)
    }

    /// Remove the latest completion. One-time chores can always be undone;
    /// everything else only on the day it was completed.
    pub fn uncomplete(ctx: &mut AppContext, id: i64) -> AppResult<UndoOutcome> {
        let mut t = Self::get(ctx, id)?;
        let latest = match cq::latest_for_trackable(&ctx.pool.conn, id)? {
            Some(c) => c,
            None => return Ok(UndoOutcome::NothingToUndo),
        };

        if !t.is_one_time_chore() && !same_local_day(latest.completed_at, ctx.now()) {
            return Ok(UndoOutcome::NotToday);
        }

        cq::delete_completion(&ctx.pool.conn, latest.id)?;
        ctx.ledger.track_delete(EntityType::Completion, latest.id);

        let remaining = cq::latest_for_trackable(&ctx.pool.conn, id)?.map(|c| c.completed_at);
        t.last_completed = remaining;

        if t.is_chore() && t.repeats() {
            let restored = t
                .previous_next_due_date
                .take()
                .unwrap_or_else(|| next_due(remaining.unwrap_or(t.created_at), &t.recurrence));
            t.next_due_date = Some(restored);
        }

        Self::store(ctx, &t)?;
        ctx.log(
            "undo",
            &format!("trackable #{}", id),
            &format!("Removed completion #{}", latest.id),
        );

        Ok(UndoOutcome::Removed {
            completion_id: latest.id,
            last_completed: remaining,
        })
    }

    /// Delete one history entry and re-derive the trackable's cached fields.
    pub fn delete_completion(ctx: &mut AppContext, completion_id: i64) -> AppResult<Completion> {
        let c = cq::get_completion(&ctx.pool.conn, completion_id)?.ok_or(AppError::NotFound {
            entity: "Completion",
            id: completion_id,
        })?;

        cq::delete_completion(&ctx.pool.conn, completion_id)?;
        ctx.ledger.track_delete(EntityType::Completion, completion_id);

        if let Some(mut t) = tq::get_trackable(&ctx.pool.conn, c.trackable_id)? {
            let remaining = cq::latest_for_trackable(&ctx.pool.conn, t.id)?.map(|c| c.completed_at);
            let was_latest = t.last_completed.is_none_or(|last| c.completed_at >= last);

            if t.last_completed != remaining {
                t.last_completed = remaining;
                if was_latest && t.is_chore() && t.repeats() {
                    t.next_due_date =
                        Some(next_due(remaining.unwrap_or(t.created_at), &t.recurrence));
                }
                Self::store(ctx, &t)?;
            }
        }

        ctx.log(
            "del",
            &format!("completion #{}", completion_id),
            &format!("Removed history entry of trackable #{}", c.trackable_id),
        );

        Ok(c)
    }

    /// Completions of a trackable, newest first.
    pub fn history(ctx: &AppContext, id: i64) -> AppResult<Vec<Completion>> {
        Self::get(ctx, id)?;
        cq::for_trackable(&ctx.pool.conn, id)
    }

    /// Archive one-time chores whose last completion is more than a day old.
    /// Returns the archived ids.
    pub fn archive_sweep(ctx: &mut AppContext) -> AppResult<Vec<i64>> {
        let cutoff = ctx.now() - Duration::hours(24);
        let chores = tq::list_by_type(&ctx.pool.conn, TrackableType::Chore, false)?;
        let mut archived = Vec::new();

        for mut t in chores.into_iter().filter(Trackable::is_one_time_chore) {
            let Some(latest) = cq::latest_for_trackable(&ctx.pool.conn, t.id)? else {
                continue;
            };
            if latest.completed_at < cutoff {
                t.archived = true;
                Self::store(ctx, &t)?;
                archived.push(t.id);
            }
        }

        if !archived.is_empty() {
            ctx.log(
                "archive",
                "chores",
                &format!("Auto-archived {} completed one-time chore(s)", archived.len()),
            );
        }

        Ok(archived)
    }

    /// Trackables of one type with their derived status, in display order.
    /// Chores are swept for finished one-time items first; exercises can be
    /// narrowed to one person.
    pub fn load(
        ctx: &mut AppContext,
        kind: TrackableType,
        person: Option<&str>,
        include_archived: bool,
    ) -> AppResult<Vec<TrackableStatus>> {
        if kind == TrackableType::Chore {
            Self::archive_sweep(ctx)?;
        }

        let now = ctx.now();
        let mut items = tq::list_by_type(&ctx.pool.conn, kind, include_archived)?;
        if kind == TrackableType::Exercise
            && let Some(pid) = person
        {
            items.retain(|t| t.person_id.as_deref() == Some(pid));
        }

        let mut out = Vec::with_capacity(items.len());
        for t in &items {
            let completions = cq::for_trackable(&ctx.pool.conn, t.id)?;
            out.push(compute_status(t, &completions, now));
        }
        sort_for_display(&mut out, now);

        Ok(out)
    }

    fn record(
        ctx: &mut AppContext,
        id: i64,
        at: DateTime<Utc>,
        notes: Option<String>,
        amount: Option<f64>,
    ) -> AppResult<CompletionOutcome> {
        let requested = amount.unwrap_or(1.0);
        if !requested.is_finite() || requested <= 0.0 {
            return Err(AppError::InvalidAmount(requested.to_string()));
        }

        let mut t = Self::get(ctx, id)?;
        let history = cq::for_trackable(&ctx.pool.conn, id)?;

        if t.is_chore() && t.repeats() && history.iter().any(|c| same_local_day(c.completed_at, at))
        {
            return Ok(CompletionOutcome::AlreadyCompletedOnDay);
        }

        let mut final_amount = requested;
        if t.is_exercise() {
            let remaining = remaining_allowed(&debt_for(&t, ctx.now(), &history));
            if remaining <= 0.0 {
                return Ok(CompletionOutcome::QuotaReached);
            }
            final_amount = requested.min(remaining);
        }

        let mut completion = Completion::new(id, at, Some(final_amount));
        completion.notes = notes.filter(|n| !n.trim().is_empty());
        completion.id = cq::insert_completion(&ctx.pool.conn, &completion)?;
        ctx.ledger
            .track_add(EntityPayload::Completion(completion.clone()));

        let latest = history
            .iter()
            .map(|c| c.completed_at)
            .chain(std::iter::once(at))
            .max()
            .unwrap_or(at);
        t.last_completed = Some(latest);

        if t.is_chore() && t.repeats() {
            if latest == at {
                t.previous_next_due_date = t.next_due_date;
            }
            t.next_due_date = Some(next_due(latest, &t.recurrence));
        }

        Self::store(ctx, &t)?;
        ctx.log(
            "done",
            &format!("trackable #{}", id),
            &format!("Completed '{}' ({})", t.name, final_amount),
        );

        Ok(if final_amount < requested {
            CompletionOutcome::Capped {
                id: completion.id,
                requested,
                amount: final_amount,
            }
        } else {
            CompletionOutcome::Recorded {
                id: completion.id,
                amount: final_amount,
            }
        })
    }

    fn store(ctx: &mut AppContext, t: &Trackable) -> AppResult<()> {
        if tq::update_trackable(&ctx.pool.conn, t)? == 0 {
            return Err(AppError::NotFound {
                entity: "Trackable",
                id: t.id,
            });
        }
        ctx.ledger
            .track_add_or_update(EntityPayload::Trackable(t.clone()));
        Ok(())
    }
}
