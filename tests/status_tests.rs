use chrono::Duration;
use rhousekeep::core::status::{compute_status, is_due_today, sort_for_display};
use rhousekeep::models::completion::Completion;

mod common;
use common::{chore, exercise, ts};

#[test]
fn chore_without_history_is_due_one_interval_after_creation() {
    let t = chore(1, "Vacuum", "2024-03-01T09:00:00Z");
    let now = ts("2024-03-04T12:00:00Z");

    let s = compute_status(&t, &[], now);

    assert!(s.last_completed.is_none());
    assert_eq!(s.next_due, ts("2024-03-08T09:00:00Z"));
    assert!(!s.is_overdue);
    assert_eq!(s.days_overdue, 0);
    assert!(s.debt.is_none());
}

#[test]
fn overdue_days_follow_the_latest_completion() {
    let t = chore(1, "Vacuum", "2024-01-01T09:00:00Z");
    let history = vec![
        Completion::new(1, ts("2024-01-20T09:00:00Z"), None),
        Completion::new(1, ts("2024-01-10T09:00:00Z"), None),
    ];

    let s = compute_status(&t, &history, ts("2024-01-30T10:00:00Z"));

    assert_eq!(s.last_completed, Some(ts("2024-01-20T09:00:00Z")));
    assert_eq!(s.days_overdue, 3);
    assert!(s.is_overdue);
    assert_eq!(s.completion_count, 2);
}

#[test]
fn stored_due_date_wins_for_chores() {
    let mut t = chore(1, "Windows", "2024-01-01T09:00:00Z");
    t.next_due_date = Some(ts("2024-02-01T09:00:00Z"));

    let s = compute_status(&t, &[], ts("2024-01-20T09:00:00Z"));

    assert_eq!(s.next_due, ts("2024-02-01T09:00:00Z"));
    assert!(!s.is_overdue);
}

#[test]
fn completed_one_time_chore_is_never_overdue() {
    let mut t = chore(1, "Fix the shelf", "2024-01-01T09:00:00Z");
    t.is_repeating = Some(false);
    t.next_due_date = Some(ts("2024-01-02T09:00:00Z"));
    let history = vec![Completion::new(1, ts("2024-01-05T09:00:00Z"), None)];

    let s = compute_status(&t, &history, ts("2024-03-01T09:00:00Z"));

    assert_eq!(s.days_overdue, 0);
    assert!(!s.is_overdue);
}

#[test]
fn exercise_is_overdue_only_with_debt() {
    let t = exercise(1, "Push-ups", 10.0, 7, "2024-01-01T12:00:00Z");
    let now = ts("2024-01-11T12:00:00Z");

    let behind = compute_status(&t, &[Completion::new(1, ts("2024-01-03T12:00:00Z"), Some(5.0))], now);
    assert!(behind.is_overdue);
    assert_eq!(behind.debt_amount(), 5.0);

    let even = compute_status(&t, &[Completion::new(1, ts("2024-01-03T12:00:00Z"), Some(10.0))], now);
    assert!(!even.is_overdue);
    assert_eq!(even.debt_amount(), 0.0);
}

#[test]
fn exercise_totals_split_by_month_and_year() {
    let t = exercise(1, "Running", 5.0, 7, "2023-12-01T12:00:00Z");
    let history = vec![
        Completion::new(1, ts("2023-12-15T12:00:00Z"), Some(3.0)),
        Completion::new(1, ts("2024-02-10T12:00:00Z"), Some(4.0)),
        Completion::new(1, ts("2024-03-02T12:00:00Z"), Some(2.5)),
        Completion::new(1, ts("2024-03-03T12:00:00Z"), None),
    ];

    let s = compute_status(&t, &history, ts("2024-03-15T12:00:00Z"));

    assert_eq!(s.monthly_total, 3.5);
    assert_eq!(s.yearly_total, 7.5);
}

#[test]
fn chores_sort_overdue_then_today_then_one_time() {
    let now = ts("2024-03-10T12:00:00Z");

    let mut later = chore(1, "Later", "2024-03-01T12:00:00Z");
    later.next_due_date = Some(now + Duration::days(5));

    let mut one_time = chore(2, "Once", "2024-03-01T12:00:00Z");
    one_time.is_repeating = Some(false);
    one_time.next_due_date = Some(now + Duration::days(9));

    let mut today = chore(3, "Today", "2024-03-01T12:00:00Z");
    today.next_due_date = Some(now);

    let mut overdue = chore(4, "Overdue", "2024-03-01T12:00:00Z");
    overdue.next_due_date = Some(now - Duration::days(3));

    let mut items: Vec<_> = [later, one_time, today, overdue]
        .iter()
        .map(|t| compute_status(t, &[], now))
        .collect();
    sort_for_display(&mut items, now);

    let order: Vec<&str> = items.iter().map(|s| s.trackable.name.as_str()).collect();
    assert_eq!(order, vec!["Overdue", "Today", "Once", "Later"]);
    assert!(is_due_today(&items[1], now));
}

#[test]
fn exercises_sort_by_highest_debt() {
    let now = ts("2024-01-22T12:00:00Z");
    let small = exercise(1, "Small", 10.0, 7, "2024-01-01T12:00:00Z");
    let big = exercise(2, "Big", 50.0, 7, "2024-01-01T12:00:00Z");

    let mut items = vec![compute_status(&small, &[], now), compute_status(&big, &[], now)];
    sort_for_display(&mut items, now);

    assert_eq!(items[0].trackable.name, "Big");
    assert_eq!(items[0].debt_amount(), 150.0);
    assert_eq!(items[1].debt_amount(), 30.0);
}
