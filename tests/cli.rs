use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn pocket(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pocket").unwrap();
    cmd.env("POCKET_LEDGER_DATA_DIR", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    pocket(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));
    dir
}

#[test]
fn init_seeds_default_categories() {
    let dir = initialized();
    pocket(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food & Drink"))
        .stdout(predicate::str::contains("Salary"));
}

#[test]
fn add_and_list_transactions() {
    let dir = initialized();
    pocket(&dir)
        .args(["tx", "add", "Paycheck", "3200", "--type", "income", "-c", "Salary", "-d", "2025-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Type:        Income"));
    pocket(&dir)
        .args(["tx", "add", "Groceries", "84.5", "-c", "Food & Drink", "-d", "2025-03-02"])
        .assert()
        .success();

    pocket(&dir)
        .args(["tx", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paycheck"))
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Showing 2 transactions"));

    pocket(&dir)
        .args(["tx", "list", "--type", "expense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Paycheck").not());

    pocket(&dir)
        .args(["tx", "totals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$3,115.50"));
}

#[test]
fn rejects_non_positive_amount() {
    let dir = initialized();
    pocket(&dir)
        .args(["tx", "add", "Nothing", "0", "-c", "Shopping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn overspent_budget_raises_notification() {
    let dir = initialized();
    pocket(&dir)
        .args(["budget", "create", "Food", "100", "-c", "Food & Drink"])
        .assert()
        .success();
    pocket(&dir)
        .args(["tx", "add", "Dinner out", "120", "-c", "Food & Drink"])
        .assert()
        .success();

    pocket(&dir)
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exceeded"));
    pocket(&dir)
        .args(["notify", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget exceeded"));
}

#[test]
fn loan_calculator_and_history() {
    let dir = initialized();
    pocket(&dir)
        .args(["calc", "loan", "50000", "36", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$1,566.82"));

    pocket(&dir)
        .args(["calc", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loan"));

    pocket(&dir)
        .args(["calc", "loan", "50000", "0", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn calculators_reject_terms_over_a_century() {
    let dir = initialized();
    pocket(&dir)
        .args(["calc", "mortgage", "500000", "100000", "300000000", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
    pocket(&dir)
        .args(["calc", "savings", "500", "101", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn unusable_date_format_is_rejected() {
    let dir = initialized();
    pocket(&dir)
        .args(["config", "--date-format", "%Q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));

    pocket(&dir)
        .args(["config", "--date-format", "%d/%m/%Y"])
        .assert()
        .success();
    pocket(&dir)
        .args(["tx", "add", "Lunch", "12.50", "-c", "Food & Drink", "-d", "2025-03-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains("07/03/2025"));
}

#[test]
fn savings_projection() {
    let dir = initialized();
    pocket(&dir)
        .args(["calc", "savings", "500", "10", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$91,473.02"));
}

#[test]
fn report_without_transactions() {
    let dir = initialized();
    pocket(&dir)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions yet"));
}

#[test]
fn export_then_import_round_trip() {
    let dir = initialized();
    pocket(&dir)
        .args(["tx", "add", "Rent", "900", "-c", "Home", "-d", "2025-01-01"])
        .assert()
        .success();

    let export_path = dir.path().join("backup.json");
    pocket(&dir)
        .args(["export", "json", "-o"])
        .arg(&export_path)
        .assert()
        .success();
    let exported = fs::read_to_string(&export_path).unwrap();
    assert!(exported.contains("\"exportDate\""));

    pocket(&dir)
        .args(["tx", "add", "Coffee", "4", "-c", "Food & Drink"])
        .assert()
        .success();
    pocket(&dir)
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 transactions"));

    pocket(&dir)
        .args(["tx", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("Coffee").not());
}

#[test]
fn bad_import_leaves_ledger_untouched() {
    let dir = initialized();
    pocket(&dir)
        .args(["tx", "add", "Rent", "900", "-c", "Home", "-d", "2025-01-01"])
        .assert()
        .success();

    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"transactions": "nope"}"#).unwrap();
    pocket(&dir)
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));

    pocket(&dir)
        .args(["tx", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"));
}

#[test]
fn notification_settings_round_trip() {
    let dir = initialized();
    pocket(&dir)
        .args(["notify", "settings", "--toggle", "goal=off", "--dedup-hours", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("goal off"))
        .stdout(predicate::str::contains("Dedup window: 6 hours"));

    pocket(&dir)
        .args(["notify", "settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("goal off"));
}
