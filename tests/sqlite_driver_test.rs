//! End-to-end sqlite3 driver tests. Skipped when the sqlite3 binary is
//! not installed; the parser itself is covered by unit tests.

#![cfg(unix)]

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use deckrun::drivers::{Driver, SqliteDriver};
use deckrun::ExecOptions;

fn sqlite3_available() -> bool {
    std::process::Command::new("sqlite3")
        .arg("--version")
        .output()
        .is_ok()
}

#[tokio::test]
async fn in_memory_query_yields_structured_rows() {
    if !sqlite3_available() {
        println!("Warning: sqlite3 not found on PATH, skipping");
        return;
    }

    let driver = SqliteDriver::new();
    let code = "CREATE TABLE t(id INTEGER, name TEXT);\n\
                INSERT INTO t VALUES (1, 'ada'), (2, 'grace');\n\
                SELECT * FROM t;";
    let result = driver.execute(&CancellationToken::new(), code, &ExecOptions::new()).await;
    assert!(result.success, "error: {}", result.error);

    let rows = result.data.expect("structured rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], Value::String("1".into()));
    assert_eq!(rows[1]["name"], Value::String("grace".into()));
}

#[tokio::test]
async fn syntax_errors_surface_verbatim() {
    if !sqlite3_available() {
        println!("Warning: sqlite3 not found on PATH, skipping");
        return;
    }

    let driver = SqliteDriver::new();
    let result = driver
        .execute(&CancellationToken::new(), "SELEC 1;", &ExecOptions::new())
        .await;
    assert!(!result.success);
    assert!(!result.error.is_empty());
    assert!(result.data.is_none());
}
