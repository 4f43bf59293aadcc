use crate::cli::parser::TrackableAction;
use crate::context::AppContext;
use crate::core::people::PeopleLogic;
use crate::core::status::is_due_today;
use crate::core::trackables::{CompletionOutcome, TrackableLogic, UndoOutcome};
use crate::errors::{AppError, AppResult};
use crate::models::status::TrackableStatus;
use crate::models::trackable::{ExerciseUnit, NewTrackable, Recurrence, TrackablePatch, TrackableType};
use crate::ui::messages::{detail, info, success, warning};
use crate::utils::colors::{GREY, RESET, color_for_due, colorize_optional};
use crate::utils::date::{format_local, parse_datetime};
use crate::utils::formatting::{describe_due, describe_quota, format_amount};
use crate::utils::table::Table;

fn parse_recurrence(s: &str) -> AppResult<Recurrence> {
    Recurrence::parse(s).ok_or_else(|| AppError::InvalidRecurrence(s.to_string()))
}

fn parse_unit(s: &str) -> AppResult<ExerciseUnit> {
    ExerciseUnit::from_db_str(s)
        .ok_or_else(|| AppError::Other(format!("Unknown exercise unit '{}'", s)))
}

fn label(kind: TrackableType) -> &'static str {
    match kind {
        TrackableType::Chore => "Chore",
        TrackableType::Exercise => "Exercise",
    }
}

/// Look the item up and make sure it is of the kind the command was run for.
fn expect_kind(ctx: &AppContext, kind: TrackableType, id: i64) -> AppResult<()> {
    let t = TrackableLogic::get(ctx, id)?;
    if t.kind != kind {
        return Err(AppError::NotFound {
            entity: label(kind),
            id,
        });
    }
    Ok(())
}

pub fn handle(kind: TrackableType, action: &TrackableAction, ctx: &mut AppContext) -> AppResult<()> {
    match action {
        TrackableAction::Add {
            name,
            every,
            description,
            target,
            unit,
            person,
            repeating,
            due_in,
        } => {
            let recurrence = parse_recurrence(every)?;
            let mut new = match kind {
                TrackableType::Chore => {
                    let mut n = NewTrackable::chore(name, recurrence);
                    n.is_repeating = Some(*repeating);
                    n.days_until_due = *due_in;
                    n
                }
                TrackableType::Exercise => {
                    let target = target.ok_or_else(|| {
                        AppError::Other("Exercises need a --target per period".into())
                    })?;
                    let mut n = NewTrackable::exercise(name, recurrence, target);
                    n.exercise_unit = Some(match unit {
                        Some(u) => parse_unit(u)?,
                        None => ExerciseUnit::Reps,
                    });
                    n.person_id = person
                        .clone()
                        .or_else(|| PeopleLogic::selected(ctx).map(|p| p.id.clone()));
                    n
                }
            };
            new.description = description.clone();

            let t = TrackableLogic::add(ctx, new)?;
            success(format!(
                "{} #{} '{}' added ({})",
                label(kind),
                t.id,
                t.name,
                t.recurrence
            ));
            if let Some(due) = t.next_due_date {
                detail(format!("Due {}", describe_due(due, ctx.now())));
            }
        }

        TrackableAction::List {
            archived,
            person,
            everyone,
        } => {
            let person = match (kind, everyone) {
                (TrackableType::Exercise, false) => person
                    .clone()
                    .or_else(|| PeopleLogic::selected(ctx).map(|p| p.id.clone())),
                _ => None,
            };
            let items = TrackableLogic::load(ctx, kind, person.as_deref(), *archived)?;
            print_list(ctx, kind, &items);
        }

        TrackableAction::Done { id, amount, notes } => {
            expect_kind(ctx, kind, *id)?;
            let outcome = TrackableLogic::mark_complete(ctx, *id, notes.clone(), *amount)?;
            report_completion(&outcome);
        }

        TrackableAction::Past {
            id,
            days_ago,
            amount,
        } => {
            expect_kind(ctx, kind, *id)?;
            let outcome = TrackableLogic::mark_complete_past(ctx, *id, *days_ago, *amount)?;
            report_completion(&outcome);
        }

        TrackableAction::Undo { id } => {
            expect_kind(ctx, kind, *id)?;
            match TrackableLogic::uncomplete(ctx, *id)? {
                UndoOutcome::Removed {
                    completion_id,
                    last_completed,
                } => {
                    success(format!("Completion #{} removed", completion_id));
                    if let Some(at) = last_completed {
                        detail(format!("Last completed {}", format_local(at)));
                    }
                }
                UndoOutcome::NotToday => {
                    warning("Only completions from today can be undone (use `remove-entry`)")
                }
                UndoOutcome::NothingToUndo => info("Nothing to undo"),
            }
        }

        TrackableAction::History { id } => {
            expect_kind(ctx, kind, *id)?;
            let t = TrackableLogic::get(ctx, *id)?;
            let history = TrackableLogic::history(ctx, *id)?;
            if history.is_empty() {
                info(format!("'{}' has never been completed", t.name));
                return Ok(());
            }

            let mut table = Table::new(&["ID", "Completed", "Amount", "Notes"]);
            for c in &history {
                table.add_row(vec![
                    c.id.to_string(),
                    format_local(c.completed_at),
                    format_amount(c.units()),
                    colorize_optional(c.notes.as_deref().unwrap_or("--")),
                ]);
            }
            println!("📜 History of '{}':\n", t.name);
            print!("{}", table.render());
        }

        TrackableAction::RemoveEntry { completion_id } => {
            let c = TrackableLogic::delete_completion(ctx, *completion_id)?;
            success(format!(
                "History entry #{} ({}) removed",
                c.id,
                format_local(c.completed_at)
            ));
        }

        TrackableAction::Edit {
            id,
            name,
            description,
            every,
            target,
            unit,
            person,
            repeating,
        } => {
            expect_kind(ctx, kind, *id)?;
            let patch = TrackablePatch {
                name: name.clone(),
                description: description.clone(),
                recurrence: every.as_deref().map(parse_recurrence).transpose()?,
                person_id: person.clone(),
                exercise_unit: unit.as_deref().map(parse_unit).transpose()?,
                target_amount: *target,
                is_repeating: *repeating,
            };
            if patch.is_empty() {
                info("Nothing to change");
                return Ok(());
            }
            let t = TrackableLogic::update(ctx, *id, &patch)?;
            success(format!("{} #{} updated", label(kind), t.id));
        }

        TrackableAction::Reschedule { id, date } => {
            expect_kind(ctx, kind, *id)?;
            let due = parse_datetime(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
            let t = TrackableLogic::reschedule(ctx, *id, due)?;
            success(format!(
                "'{}' now due {}",
                t.name,
                describe_due(due, ctx.now())
            ));
        }

        TrackableAction::Archive { id } | TrackableAction::Unarchive { id } => {
            expect_kind(ctx, kind, *id)?;
            let archive = matches!(action, TrackableAction::Archive { .. });
            let t = TrackableLogic::set_archived(ctx, *id, archive)?;
            success(format!(
                "'{}' {}",
                t.name,
                if archive { "archived" } else { "restored" }
            ));
        }

        TrackableAction::Delete { id } => {
            expect_kind(ctx, kind, *id)?;
            let removed = TrackableLogic::delete(ctx, *id)?;
            success(format!(
                "{} #{} deleted with {} completion(s)",
                label(kind),
                id,
                removed
            ));
        }
    }

    Ok(())
}

fn report_completion(outcome: &CompletionOutcome) {
    match outcome {
        CompletionOutcome::Recorded { id, amount } => {
            success(format!("Completion #{} recorded ({})", id, format_amount(*amount)))
        }
        CompletionOutcome::Capped {
            id,
            requested,
            amount,
        } => {
            success(format!("Completion #{} recorded", id));
            warning(format!(
                "Requested {} but only {} fit before the advance limit",
                format_amount(*requested),
                format_amount(*amount)
            ));
        }
        CompletionOutcome::QuotaReached => {
            warning("Quota reached: this period and the next one are already done")
        }
        CompletionOutcome::AlreadyCompletedOnDay => {
            warning("Already completed on that day")
        }
    }
}

fn print_list(ctx: &AppContext, kind: TrackableType, items: &[TrackableStatus]) {
    if items.is_empty() {
        info(format!("No {}s yet", label(kind).to_lowercase()));
        return;
    }

    let now = ctx.now();
    let mut table = match kind {
        TrackableType::Chore => Table::new(&["ID", "Name", "Due", "Every", "Last done"]),
        TrackableType::Exercise => {
            Table::new(&["ID", "Name", "Owner", "Period", "This month", "Every"])
        }
    };

    for s in items {
        let t = &s.trackable;
        let mut name = t.name.clone();
        if t.archived {
            name = format!("{GREY}{name} (archived){RESET}");
        }

        match kind {
            TrackableType::Chore => {
                let due = if t.is_one_time_chore() && s.last_completed.is_some() {
                    format!("{GREY}done{RESET}")
                } else {
                    let color = color_for_due(s.is_overdue, is_due_today(s, now));
                    format!("{}{}{}", color, describe_due(s.next_due, now), RESET)
                };
                let every = if t.repeats() {
                    t.recurrence.to_string()
                } else {
                    "once".to_string()
                };
                table.add_row(vec![
                    t.id.to_string(),
                    name,
                    due,
                    every,
                    colorize_optional(&s.last_completed.map(format_local).unwrap_or_else(|| "--".into())),
                ]);
            }
            TrackableType::Exercise => {
                let owner = t
                    .person_id
                    .as_deref()
                    .and_then(|pid| ctx.config.people.iter().find(|p| p.id == pid))
                    .map(|p| format!("{} {}", p.emoji, p.name))
                    .unwrap_or_else(|| "--".to_string());
                let color = color_for_due(s.is_overdue, false);
                table.add_row(vec![
                    t.id.to_string(),
                    name,
                    colorize_optional(&owner),
                    format!("{}{}{}", color, describe_quota(s), RESET),
                    format_amount(s.monthly_total),
                    t.recurrence.to_string(),
                ]);
            }
        }
    }

    print!("{}", table.render());
}
