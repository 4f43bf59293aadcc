use chrono::{Days, Duration};
use rhousekeep::core::recurrence::next_due;
use rhousekeep::core::trackables::{CompletionOutcome, TrackableLogic, UndoOutcome};
use rhousekeep::errors::AppError;
use rhousekeep::models::change::{ChangeType, EntityType};
use rhousekeep::models::trackable::{
    NewTrackable, Recurrence, RecurrenceUnit, TrackablePatch, TrackableType,
};
use rhousekeep::utils::date::{end_of_local_day, local_day};

mod common;
use common::test_ctx;

fn weekly() -> Recurrence {
    Recurrence::new(1, RecurrenceUnit::Weeks)
}

fn repeating_chore(name: &str) -> NewTrackable {
    let mut n = NewTrackable::chore(name, weekly());
    n.is_repeating = Some(true);
    n
}

#[test]
fn new_chore_is_one_time_and_due_now() {
    let (mut ctx, _clock) = test_ctx();

    let t = TrackableLogic::add(&mut ctx, NewTrackable::chore("Fix the shelf", weekly()))
        .expect("added");

    assert_eq!(t.is_repeating, Some(false));
    assert!(t.is_one_time_chore());
    assert_eq!(t.next_due_date, Some(ctx.now()));
    assert_eq!(
        ctx.ledger.get(EntityType::Trackable, t.id).map(|c| c.change_type),
        Some(ChangeType::Add)
    );
}

#[test]
fn repeating_chore_is_due_one_interval_out() {
    let (mut ctx, _clock) = test_ctx();

    let t = TrackableLogic::add(&mut ctx, repeating_chore("Vacuum")).expect("added");

    assert_eq!(t.next_due_date, Some(next_due(ctx.now(), &weekly())));
}

#[test]
fn due_in_overrides_the_first_due_date() {
    let (mut ctx, _clock) = test_ctx();
    let mut new = repeating_chore("Windows");
    new.days_until_due = Some(3);

    let t = TrackableLogic::add(&mut ctx, new).expect("added");

    let due = t.next_due_date.expect("due date");
    assert_eq!(local_day(due), local_day(ctx.now()) + Duration::days(3));
}

#[test]
fn empty_name_and_negative_target_are_rejected() {
    let (mut ctx, _clock) = test_ctx();

    assert!(TrackableLogic::add(&mut ctx, NewTrackable::chore("   ", weekly())).is_err());

    let err = TrackableLogic::add(&mut ctx, NewTrackable::exercise("Push-ups", weekly(), -5.0))
        .expect_err("negative target");
    assert!(matches!(err, AppError::InvalidAmount(_)));
}

#[test]
fn repeating_chore_takes_one_completion_per_day() {
    let (mut ctx, clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Dishes")).expect("added");
    let first_due = t.next_due_date;

    let outcome = TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("completed");
    assert!(matches!(outcome, CompletionOutcome::Recorded { amount, .. } if amount == 1.0));

    let stored = TrackableLogic::get(&ctx, t.id).expect("stored");
    assert_eq!(stored.last_completed, Some(ctx.now()));
    assert_eq!(stored.next_due_date, Some(next_due(ctx.now(), &weekly())));
    assert_eq!(stored.previous_next_due_date, first_due);

    let again = TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("checked");
    assert_eq!(again, CompletionOutcome::AlreadyCompletedOnDay);

    clock.advance(Duration::days(1));
    let next_day = TrackableLogic::mark_complete(&mut ctx, t.id, Some("quick".into()), None)
        .expect("completed");
    assert!(next_day.completion_id().is_some());

    let history = TrackableLogic::history(&ctx, t.id).expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].notes.as_deref(), Some("quick"));
}

#[test]
fn non_positive_amounts_are_rejected() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Dishes")).expect("added");

    for amount in [0.0, -3.0, f64::NAN] {
        let err = TrackableLogic::mark_complete(&mut ctx, t.id, None, Some(amount))
            .expect_err("invalid amount");
        assert!(matches!(err, AppError::InvalidAmount(_)));
    }
    assert!(TrackableLogic::history(&ctx, t.id).expect("history").is_empty());
}

#[test]
fn undo_restores_the_previous_due_date() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Laundry")).expect("added");
    TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("completed");

    let outcome = TrackableLogic::uncomplete(&mut ctx, t.id).expect("undone");

    assert!(matches!(
        outcome,
        UndoOutcome::Removed {
            last_completed: None,
            ..
        }
    ));
    let stored = TrackableLogic::get(&ctx, t.id).expect("stored");
    assert_eq!(stored.next_due_date, t.next_due_date);
    assert!(stored.last_completed.is_none());

    assert_eq!(
        TrackableLogic::uncomplete(&mut ctx, t.id).expect("nothing"),
        UndoOutcome::NothingToUndo
    );
}

#[test]
fn only_todays_completion_can_be_undone() {
    let (mut ctx, clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Laundry")).expect("added");
    TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("completed");

    clock.advance(Duration::days(2));

    assert_eq!(
        TrackableLogic::uncomplete(&mut ctx, t.id).expect("checked"),
        UndoOutcome::NotToday
    );
    assert_eq!(TrackableLogic::history(&ctx, t.id).expect("history").len(), 1);
}

#[test]
fn one_time_chore_can_be_undone_later() {
    let (mut ctx, clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, NewTrackable::chore("Call the plumber", weekly()))
        .expect("added");
    TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("completed");

    clock.advance(Duration::hours(20));

    let outcome = TrackableLogic::uncomplete(&mut ctx, t.id).expect("undone");
    assert!(matches!(outcome, UndoOutcome::Removed { .. }));
}

#[test]
fn completed_one_time_chores_are_archived_after_a_day() {
    let (mut ctx, clock) = test_ctx();
    let once = TrackableLogic::add(&mut ctx, NewTrackable::chore("Return parcel", weekly()))
        .expect("added");
    let weekly_chore = TrackableLogic::add(&mut ctx, repeating_chore("Vacuum")).expect("added");
    TrackableLogic::mark_complete(&mut ctx, once.id, None, None).expect("completed");

    clock.advance(Duration::hours(23));
    let visible = TrackableLogic::load(&mut ctx, TrackableType::Chore, None, false).expect("load");
    assert_eq!(visible.len(), 2);

    clock.advance(Duration::hours(2));
    let visible = TrackableLogic::load(&mut ctx, TrackableType::Chore, None, false).expect("load");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].trackable.id, weekly_chore.id);

    assert!(TrackableLogic::get(&ctx, once.id).expect("stored").archived);
    let all = TrackableLogic::load(&mut ctx, TrackableType::Chore, None, true).expect("load");
    assert_eq!(all.len(), 2);
}

#[test]
fn exercise_completion_is_capped_at_one_period_in_advance() {
    let (mut ctx, _clock) = test_ctx();
    let days = Recurrence::new(7, RecurrenceUnit::Days);
    let t = TrackableLogic::add(&mut ctx, NewTrackable::exercise("Push-ups", days, 10.0))
        .expect("added");

    let outcome = TrackableLogic::mark_complete(&mut ctx, t.id, None, Some(25.0)).expect("capped");
    assert!(matches!(
        outcome,
        CompletionOutcome::Capped { requested, amount, .. } if requested == 25.0 && amount == 20.0
    ));

    let again = TrackableLogic::mark_complete(&mut ctx, t.id, None, Some(1.0)).expect("checked");
    assert_eq!(again, CompletionOutcome::QuotaReached);

    let history = TrackableLogic::history(&ctx, t.id).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, Some(20.0));
}

#[test]
fn exercise_allows_several_entries_per_day() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(
        &mut ctx,
        NewTrackable::exercise("Squats", Recurrence::new(1, RecurrenceUnit::Weeks), 30.0),
    )
    .expect("added");

    TrackableLogic::mark_complete(&mut ctx, t.id, None, Some(10.0)).expect("first");
    TrackableLogic::mark_complete(&mut ctx, t.id, None, Some(10.0)).expect("second");

    let status = TrackableLogic::load(&mut ctx, TrackableType::Exercise, None, false)
        .expect("load")
        .remove(0);
    let debt = status.debt.expect("exercise debt");
    assert_eq!(debt.total_completed, 20.0);
    assert_eq!(debt.current_period_done, 20.0);
}

#[test]
fn past_completion_lands_at_the_end_of_that_day() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Plants")).expect("added");

    let outcome = TrackableLogic::mark_complete_past(&mut ctx, t.id, 2, None).expect("recorded");
    assert!(outcome.completion_id().is_some());

    let expected = end_of_local_day(
        local_day(ctx.now())
            .checked_sub_days(Days::new(2))
            .expect("valid day"),
    );
    let history = TrackableLogic::history(&ctx, t.id).expect("history");
    assert_eq!(history[0].completed_at, expected);

    let stored = TrackableLogic::get(&ctx, t.id).expect("stored");
    assert_eq!(stored.last_completed, Some(expected));
    assert_eq!(stored.next_due_date, Some(next_due(expected, &weekly())));

    let dup = TrackableLogic::mark_complete_past(&mut ctx, t.id, 2, None).expect("checked");
    assert_eq!(dup, CompletionOutcome::AlreadyCompletedOnDay);
}

#[test]
fn older_past_completion_keeps_the_latest_as_last_completed() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Plants")).expect("added");
    TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("today");

    TrackableLogic::mark_complete_past(&mut ctx, t.id, 3, None).expect("past");

    let stored = TrackableLogic::get(&ctx, t.id).expect("stored");
    assert_eq!(stored.last_completed, Some(ctx.now()));
    assert_eq!(stored.next_due_date, Some(next_due(ctx.now(), &weekly())));
}

#[test]
fn delete_removes_history_and_tracks_every_deletion() {
    let (mut ctx, clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Dishes")).expect("added");
    TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("completed");
    clock.advance(Duration::days(1));
    TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("completed");
    let ids: Vec<i64> = TrackableLogic::history(&ctx, t.id)
        .expect("history")
        .iter()
        .map(|c| c.id)
        .collect();
    ctx.ledger.clear();

    let removed = TrackableLogic::delete(&mut ctx, t.id).expect("deleted");

    assert_eq!(removed, 2);
    assert!(matches!(
        TrackableLogic::get(&ctx, t.id),
        Err(AppError::NotFound { .. })
    ));
    for id in ids {
        assert_eq!(
            ctx.ledger.get(EntityType::Completion, id).map(|c| c.change_type),
            Some(ChangeType::Delete)
        );
    }
    assert_eq!(
        ctx.ledger.get(EntityType::Trackable, t.id).map(|c| c.change_type),
        Some(ChangeType::Delete)
    );
}

#[test]
fn deleting_an_unsynced_trackable_leaves_no_trace() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Dishes")).expect("added");
    TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("completed");

    TrackableLogic::delete(&mut ctx, t.id).expect("deleted");

    assert!(!ctx.ledger.has_changes());
}

#[test]
fn deleting_the_latest_entry_rewinds_the_schedule() {
    let (mut ctx, clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Bins")).expect("added");
    TrackableLogic::mark_complete(&mut ctx, t.id, None, None).expect("first");
    let first = ctx.now();
    clock.advance(Duration::days(2));
    let latest = TrackableLogic::mark_complete(&mut ctx, t.id, None, None)
        .expect("second")
        .completion_id()
        .expect("recorded");

    let removed = TrackableLogic::delete_completion(&mut ctx, latest).expect("removed");

    assert_eq!(removed.id, latest);
    let stored = TrackableLogic::get(&ctx, t.id).expect("stored");
    assert_eq!(stored.last_completed, Some(first));
    assert_eq!(stored.next_due_date, Some(next_due(first, &weekly())));

    assert!(matches!(
        TrackableLogic::delete_completion(&mut ctx, latest),
        Err(AppError::NotFound { .. })
    ));
}

#[test]
fn reschedule_keeps_the_previous_due_date() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Oven")).expect("added");
    let target = ctx.now() + Duration::days(10);

    let moved = TrackableLogic::reschedule(&mut ctx, t.id, target).expect("rescheduled");

    assert_eq!(moved.next_due_date, Some(target));
    assert_eq!(moved.previous_next_due_date, t.next_due_date);
}

#[test]
fn edit_applies_only_given_fields() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Oven")).expect("added");

    let patch = TrackablePatch {
        name: Some("Clean oven".into()),
        recurrence: Some(Recurrence::new(2, RecurrenceUnit::Months)),
        ..Default::default()
    };
    let edited = TrackableLogic::update(&mut ctx, t.id, &patch).expect("edited");

    assert_eq!(edited.name, "Clean oven");
    assert_eq!(edited.recurrence, Recurrence::new(2, RecurrenceUnit::Months));
    assert_eq!(edited.is_repeating, Some(true));
    assert_eq!(edited.created_at, t.created_at);
}

#[test]
fn exercises_can_be_filtered_by_owner() {
    let (mut ctx, _clock) = test_ctx();
    for (name, owner) in [("Run", "person1"), ("Swim", "person2"), ("Row", "person1")] {
        let mut new = NewTrackable::exercise(name, weekly(), 5.0);
        new.person_id = Some(owner.to_string());
        TrackableLogic::add(&mut ctx, new).expect("added");
    }

    let mine = TrackableLogic::load(&mut ctx, TrackableType::Exercise, Some("person1"), false)
        .expect("load");
    let everyone = TrackableLogic::load(&mut ctx, TrackableType::Exercise, None, false)
        .expect("load");

    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|s| s.trackable.person_id.as_deref() == Some("person1")));
    assert_eq!(everyone.len(), 3);
}

#[test]
fn archive_and_restore() {
    let (mut ctx, _clock) = test_ctx();
    let t = TrackableLogic::add(&mut ctx, repeating_chore("Gutters")).expect("added");

    TrackableLogic::set_archived(&mut ctx, t.id, true).expect("archived");
    assert!(
        TrackableLogic::load(&mut ctx, TrackableType::Chore, None, false)
            .expect("load")
            .is_empty()
    );

    TrackableLogic::set_archived(&mut ctx, t.id, false).expect("restored");
    assert_eq!(
        TrackableLogic::load(&mut ctx, TrackableType::Chore, None, false)
            .expect("load")
            .len(),
        1
    );
}
