use assert_cmd::Command;

use glance::results::{ResultHistory, TestResult};
use glance::store::{KeyValueStore, SqliteStore, RESULTS_KEY};

fn glance(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("glance").unwrap();
    // keep the log file out of the real home directory
    cmd.env("HOME", home);
    cmd
}

#[test]
fn help_describes_the_trainer() {
    let dir = tempfile::tempdir().unwrap();
    let out = glance(dir.path()).arg("--help").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("speed reading"));
    assert!(stdout.contains("--export-history"));
    assert!(stdout.contains("--generator-cmd"));
}

#[test]
fn export_prints_stored_history_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("results.db");
    {
        let store = SqliteStore::open(&db).unwrap();
        ResultHistory::from_results(vec![
            TestResult::new(250, 70, 1_700_000_000_000),
            TestResult::new(310, 90, 1_700_000_600_000),
        ])
        .save(&store)
        .unwrap();
    }

    let out = glance(dir.path())
        .arg("--export-history")
        .arg("--db")
        .arg(&db)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "taken_at,wpm,comprehension,timestamp");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].ends_with(",250,70,1700000000000"));
    assert!(lines[2].starts_with("2023-11-14T22:23:20"));
}

#[test]
fn export_treats_malformed_history_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("results.db");
    SqliteStore::open(&db)
        .unwrap()
        .set(RESULTS_KEY, "{not json")
        .unwrap();

    let out = glance(dir.path())
        .arg("--export-history")
        .arg("--db")
        .arg(&db)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty());
}

#[test]
fn non_tty_stdin_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let out = glance(dir.path())
        .arg("--db")
        .arg(dir.path().join("results.db"))
        .write_stdin("")
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("stdin must be a tty"));
}
