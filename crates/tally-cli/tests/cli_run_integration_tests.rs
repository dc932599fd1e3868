//! CLI integration tests
//!
//! Drives the built binary end to end against a temporary SQLite file and
//! verifies the idempotence story: reference tables settle after the first
//! run, transactional tables keep growing with continuous keys.

use std::path::PathBuf;
use std::process::Command;

use rusqlite::Connection;
use tempfile::TempDir;

fn tally(args: &[&str], dir: &TempDir) -> std::process::Output {
    let cli_bin = env!("CARGO_BIN_EXE_tally");
    Command::new(cli_bin)
        .current_dir(dir.path())
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("warehouse.db")
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn test_init_then_two_runs() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    let db_arg = db.to_str().unwrap();

    let init = tally(&["init", "--db", db_arg], &dir);
    assert!(
        init.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&init.stderr)
    );

    let run1 = tally(
        &["run", "--db", db_arg, "--customers", "10", "--seed", "1"],
        &dir,
    );
    assert!(
        run1.status.success(),
        "first run failed: {}",
        String::from_utf8_lossy(&run1.stderr)
    );

    let run2 = tally(
        &["run", "--db", db_arg, "--customers", "10", "--seed", "2"],
        &dir,
    );
    assert!(
        run2.status.success(),
        "second run failed: {}",
        String::from_utf8_lossy(&run2.stderr)
    );

    let conn = Connection::open(&db).unwrap();

    // Reference catalogs settled after run 1; run 2 appended nothing to them
    assert_eq!(count(&conn, "products"), 6);
    assert_eq!(count(&conn, "plans"), 4);
    assert_eq!(count(&conn, "discounts"), 4);

    // Transactional tables grew on both runs, with continuous keys
    assert_eq!(count(&conn, "customers"), 20);
    let max_customer_key: i64 = conn
        .query_row("SELECT MAX(customer_key) FROM customers", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(max_customer_key, 20);

    // Every subscription references a committed customer and plan
    let dangling: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM subscriptions s
             LEFT JOIN customers c ON c.customer_key = s.customer_key
             LEFT JOIN plans p ON p.plan_key = s.plan_key
             WHERE c.customer_key IS NULL OR p.plan_key IS NULL",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(dangling, 0, "Dangling subscription foreign keys");

    // Run 2's report told the operator about the reference skips
    let stdout = String::from_utf8_lossy(&run2.stdout);
    assert!(
        stdout.contains("skipped"),
        "Expected skip lines in summary, got:\n{}",
        stdout
    );
}

#[test]
fn test_run_without_init_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);

    let run = tally(&["run", "--db", db.to_str().unwrap()], &dir);
    assert!(!run.status.success());
    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(
        stderr.contains("not provisioned"),
        "Expected provisioning error, got: {}",
        stderr
    );
}

#[test]
fn test_json_report_output() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    let db_arg = db.to_str().unwrap();

    assert!(tally(&["init", "--db", db_arg], &dir).status.success());
    let run = tally(
        &["run", "--db", db_arg, "--customers", "3", "--seed", "7", "--json"],
        &dir,
    );
    assert!(run.status.success());

    let stdout = String::from_utf8_lossy(&run.stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(report.get("run_id").is_some());
    assert!(report
        .get("outcomes")
        .and_then(|o| o.as_array())
        .is_some_and(|o| o.len() == 9));
}

#[test]
fn test_status_lists_all_tables() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    let db_arg = db.to_str().unwrap();

    assert!(tally(&["init", "--db", db_arg], &dir).status.success());
    let status = tally(&["status", "--db", db_arg], &dir);
    assert!(status.status.success());

    let stdout = String::from_utf8_lossy(&status.stdout);
    for table in [
        "products",
        "plans",
        "discounts",
        "customers",
        "subscriptions",
        "invoices",
        "invoice_line_items",
        "payments",
        "subscription_discounts",
    ] {
        assert!(stdout.contains(table), "Missing {} in status output", table);
    }
}
