use predicates::str::contains;

mod common;
use common::{init_test_db, rhk, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    rhk()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized at"))
        .stdout(contains("initialization completed"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_chore_add_and_list() {
    let db_path = setup_test_db("cli_chore");
    init_test_db(&db_path);

    rhk()
        .args([
            "--db", &db_path, "--test", "chore", "add", "Vacuum", "--every", "3d", "--repeating",
        ])
        .assert()
        .success()
        .stdout(contains("Chore #1 'Vacuum' added (every 3 days)"));

    rhk()
        .args(["--db", &db_path, "--test", "chore", "list"])
        .assert()
        .success()
        .stdout(contains("Vacuum"))
        .stdout(contains("every 3 days"));
}

#[test]
fn test_chore_done_twice_same_day() {
    let db_path = setup_test_db("cli_chore_done");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "chore", "add", "Dishes", "-e", "1d", "--repeating"])
        .assert()
        .success();

    rhk()
        .args(["--db", &db_path, "--test", "chore", "done", "1"])
        .assert()
        .success()
        .stdout(contains("Completion #1 recorded"));

    rhk()
        .args(["--db", &db_path, "--test", "chore", "done", "1"])
        .assert()
        .success()
        .stdout(contains("Already completed on that day"));

    rhk()
        .args(["--db", &db_path, "--test", "chore", "history", "1"])
        .assert()
        .success()
        .stdout(contains("History of 'Dishes'"));
}

#[test]
fn test_exercise_requires_target() {
    let db_path = setup_test_db("cli_exercise");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "exercise", "add", "Push-ups"])
        .assert()
        .failure()
        .stderr(contains("--target"));

    rhk()
        .args([
            "--db", &db_path, "--test", "exercise", "add", "Push-ups", "--target", "50", "-e",
            "1w",
        ])
        .assert()
        .success()
        .stdout(contains("Exercise #1 'Push-ups' added"));

    rhk()
        .args(["--db", &db_path, "--test", "exercise", "done", "1", "-a", "20"])
        .assert()
        .success()
        .stdout(contains("recorded (20)"));

    rhk()
        .args(["--db", &db_path, "--test", "exercise", "list"])
        .assert()
        .success()
        .stdout(contains("20/50 reps"));
}

#[test]
fn test_unknown_item_fails() {
    let db_path = setup_test_db("cli_unknown");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "chore", "done", "42"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn test_grocery_flow() {
    let db_path = setup_test_db("cli_grocery");
    init_test_db(&db_path);

    for item in ["Milk", "Bread", "Eggs"] {
        rhk()
            .args(["--db", &db_path, "--test", "grocery", "add", item])
            .assert()
            .success();
    }

    rhk()
        .args(["--db", &db_path, "--test", "grocery", "toggle", "2"])
        .assert()
        .success()
        .stdout(contains("Bread checked"));

    rhk()
        .args(["--db", &db_path, "--test", "grocery", "list"])
        .assert()
        .success()
        .stdout(contains("Shopping list (2 to buy)"));

    rhk()
        .args(["--db", &db_path, "--test", "grocery", "move", "3", "1"])
        .assert()
        .success()
        .stdout(contains("Moved Eggs to position 1"));

    rhk()
        .args(["--db", &db_path, "--test", "grocery", "move", "3", "0"])
        .assert()
        .failure()
        .stderr(contains("Positions start at 1"));

    rhk()
        .args(["--db", &db_path, "--test", "grocery", "clear-checked"])
        .assert()
        .success()
        .stdout(contains("Removed 1 checked item(s)"));
}

#[test]
fn test_expense_done_updates_budget() {
    let db_path = setup_test_db("cli_expense");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "expense", "add", "Tyres", "320"])
        .assert()
        .success()
        .stdout(contains("Added #1 Tyres (320.00 USD)"));

    rhk()
        .args(["--db", &db_path, "--test", "expense", "done", "1"])
        .assert()
        .success()
        .stdout(contains("Tyres paid"))
        .stdout(contains("-320.00 USD"));

    rhk()
        .args(["--db", &db_path, "--test", "expense", "list"])
        .assert()
        .success()
        .stdout(contains("Still to pay: 0.00 USD"));
}

#[test]
fn test_sync_without_remote_fails() {
    let db_path = setup_test_db("cli_sync");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "grocery", "add", "Tea"])
        .assert()
        .success();

    rhk()
        .args(["--db", &db_path, "--test", "sync"])
        .assert()
        .failure()
        .stderr(contains("No remote snapshot configured"));

    // the pending change survives the failed sync
    rhk()
        .args(["--db", &db_path, "--test", "remote", "changes"])
        .assert()
        .success()
        .stdout(contains("grocery-1"));

    rhk()
        .args(["--db", &db_path, "--test", "remote", "status"])
        .assert()
        .success()
        .stdout(contains("No remote configured"))
        .stdout(contains("Pending changes: 1"))
        .stdout(contains("Never synced"));
}

#[test]
fn test_remote_changes_empty() {
    let db_path = setup_test_db("cli_changes_empty");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "remote", "changes"])
        .assert()
        .success()
        .stdout(contains("No pending changes"));
}

#[test]
fn test_log_print_shows_migrations() {
    let db_path = setup_test_db("cli_log");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"));
}

#[test]
fn test_db_info() {
    let db_path = setup_test_db("cli_db_info");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Completions:"))
        .stdout(contains("Schema version:"));

    rhk()
        .args(["--db", &db_path, "--test", "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));

    rhk()
        .args(["--db", &db_path, "--test", "db", "--migrate", "--vacuum"])
        .assert()
        .success()
        .stdout(contains("Schema is up to date"))
        .stdout(contains("Vacuum completed"));
}

#[test]
fn test_time_show() {
    let db_path = setup_test_db("cli_time");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "time", "--show"])
        .assert()
        .success()
        .stdout(contains("Current time:"));
}

#[test]
fn test_time_offset_out_of_range_fails() {
    let db_path = setup_test_db("cli_time_range");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "time", "--advance-days", "100000000"])
        .assert()
        .failure()
        .stderr(contains("out of range"));

    rhk()
        .args([
            "--db",
            &db_path,
            "--test",
            "time",
            "--advance-days",
            "9223372036854775807",
        ])
        .assert()
        .failure()
        .stderr(contains("overflows"));

    rhk()
        .args(["--db", &db_path, "--test", "time", "--advance-days", "2"])
        .assert()
        .success()
        .stdout(contains("Time offset set to 2880 minute(s)"));
}

#[test]
fn test_person_list_has_defaults() {
    let db_path = setup_test_db("cli_person");
    init_test_db(&db_path);

    rhk()
        .args(["--db", &db_path, "--test", "person", "list"])
        .assert()
        .success()
        .stdout(contains("Person 1"))
        .stdout(contains("Person 2"));
}
