//! Drives the `review-engine` binary against a temporary store.

use review_engine::repository;
use rusqlite::Connection;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ITEMS: &str = r#"[
  {
    "id": "fractions",
    "createdAt": "2024-05-01T08:00:00Z",
    "lastReviewed": "2024-06-14T09:00:00Z",
    "reviewInterval": 6,
    "reviewEase": 2.4,
    "struggleCount": 4,
    "lastStruggledAt": "2024-06-14T09:00:00Z",
    "totalStruggleTime": 300.0,
    "reviewCount": 7,
    "topics": ["math", "fractions"]
  },
  {
    "id": "decimals",
    "createdAt": "2024-05-02T08:00:00Z",
    "lastReviewed": "2024-06-14T09:00:00Z",
    "reviewInterval": 6,
    "reviewEase": 2.5,
    "struggleCount": 3,
    "lastStruggledAt": "2024-05-31T09:00:00Z",
    "reviewCount": 5,
    "topics": ["math"]
  },
  {
    "id": "rivers",
    "createdAt": "2024-05-03T08:00:00Z",
    "lastReviewed": "2024-06-13T09:00:00Z",
    "reviewInterval": 10,
    "reviewEase": 2.6,
    "struggleCount": 1,
    "lastStruggledAt": "2024-06-01T09:00:00Z",
    "reviewCount": 2,
    "topics": ["geography"]
  },
  {
    "id": "algebra-gen",
    "createdAt": "2024-06-10T08:00:00Z",
    "topics": ["algebra"],
    "isExternallyGenerated": true
  },
  {
    "id": "vectors",
    "createdAt": "2024-06-11T08:00:00Z",
    "topics": ["math", "physics"]
  }
]"#;

fn setup_store() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let items_path = tmp.path().join("items.json");
    fs::write(&items_path, ITEMS).unwrap();
    let db_path = tmp.path().join("store.db");

    let (stdout, stderr, success) = run_cli(&db_path, &["import", items_path.to_str().unwrap()]);
    assert!(success, "import failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Imported 5 items"));
    (tmp, db_path)
}

fn run_cli(db_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_review-engine");
    let output = Command::new(binary)
        .env("RUST_LOG", "info")
        .arg("--db")
        .arg(db_path)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run review-engine at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn json(stdout: &str) -> Value {
    serde_json::from_str(stdout).unwrap_or_else(|e| panic!("not JSON ({}): {}", e, stdout))
}

fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn unknown_mode_exits_non_zero() {
    let (_tmp, db) = setup_store();

    let (stdout, stderr, success) = run_cli(&db, &["queue", "cram"]);
    assert!(!success, "cram was accepted: {}", stdout);
    assert!(stderr.contains("invalid mode"), "stderr={}", stderr);
}

#[test]
fn queue_limit_truncates_ranked_output() {
    let (_tmp, db) = setup_store();

    let (stdout, _, success) = run_cli(&db, &["queue", "repeat"]);
    assert!(success);
    assert_eq!(ids(&json(&stdout)).len(), 5);

    let (stdout, _, success) = run_cli(&db, &["queue", "repeat", "--limit", "2"]);
    assert!(success);
    assert_eq!(ids(&json(&stdout)), vec!["fractions", "decimals"]);
}

#[test]
fn split_prints_study_queues_separately() {
    let (_tmp, db) = setup_store();

    let (stdout, stderr, success) = run_cli(&db, &["queue", "study", "--split"]);
    assert!(success, "stderr={}", stderr);
    let queues = json(&stdout);
    assert_eq!(ids(&queues["newItems"]), vec!["algebra-gen", "vectors"]);
    assert_eq!(ids(&queues["recentItems"]), vec!["rivers"]);
}

#[test]
fn split_is_rejected_outside_study_mode() {
    let (_tmp, db) = setup_store();

    for mode in ["repeat", "discover"] {
        let (stdout, stderr, success) = run_cli(&db, &["queue", mode, "--split"]);
        assert!(!success, "{} --split was accepted: {}", mode, stdout);
        assert!(stderr.contains("--split"), "stderr={}", stderr);
    }
}

#[test]
fn review_persists_item_and_logs_attempt() {
    let (_tmp, db) = setup_store();

    let (stdout, stderr, success) =
        run_cli(&db, &["review", "vectors", "--forgot", "--time-spent", "75"]);
    assert!(success, "review failed: stderr={}", stderr);
    let updated = json(&stdout);
    assert_eq!(updated["struggleCount"], 1);
    assert_eq!(updated["reviewCount"], 1);
    assert_eq!(updated["totalStruggleTime"], 75.0);
    assert!(stderr.contains("has 1 logged reviews"), "stderr={}", stderr);

    let (_, stderr, success) = run_cli(&db, &["review", "vectors", "--remembered"]);
    assert!(success);
    assert!(stderr.contains("has 2 logged reviews"), "stderr={}", stderr);

    let conn = Connection::open(&db).unwrap();
    let stored = repository::get_item(&conn, "vectors").unwrap().unwrap();
    assert_eq!(stored.review_count, 2);
    assert_eq!(stored.struggle_count, 1);
    assert_eq!(stored.total_struggle_time, 75.0);
    assert_eq!(repository::get_review_log_count(&conn, "vectors").unwrap(), 2);
}

#[test]
fn review_requires_an_outcome() {
    let (_tmp, db) = setup_store();

    let (_, _, success) = run_cli(&db, &["review", "vectors"]);
    assert!(!success);
    let (_, _, success) = run_cli(&db, &["review", "vectors", "--remembered", "--forgot"]);
    assert!(!success);
}

#[test]
fn invalid_time_spent_leaves_store_untouched() {
    let (_tmp, db) = setup_store();

    for time_spent in ["--time-spent=-2000", "--time-spent=NaN", "--time-spent=inf"] {
        let (stdout, stderr, success) =
            run_cli(&db, &["review", "fractions", "--forgot", time_spent]);
        assert!(!success, "{} was accepted: {}", time_spent, stdout);
        assert!(stderr.contains("time spent"), "stderr={}", stderr);
    }

    let conn = Connection::open(&db).unwrap();
    let stored = repository::get_item(&conn, "fractions").unwrap().unwrap();
    assert_eq!(stored.total_struggle_time, 300.0);
    assert_eq!(stored.struggle_count, 4);
    assert_eq!(repository::get_review_log_count(&conn, "fractions").unwrap(), 0);

    // Repeat still ranks the whole population.
    let (stdout, _, success) = run_cli(&db, &["queue", "repeat"]);
    assert!(success);
    assert_eq!(ids(&json(&stdout)).len(), 5);
}

#[test]
fn gaps_read_a_performance_map_from_file() {
    let (tmp, db) = setup_store();
    let performance = tmp.path().join("performance.json");
    fs::write(
        &performance,
        r#"{
          "q1": {"correct": false, "topics": ["math", "fractions"]},
          "q2": {"correct": true, "topics": ["math"]},
          "q3": {"correct": false, "topics": ["math"]},
          "q4": {"correct": true, "topics": ["art"]}
        }"#,
    )
    .unwrap();

    let (stdout, stderr, success) =
        run_cli(&db, &["gaps", "--from", performance.to_str().unwrap()]);
    assert!(success, "gaps failed: stderr={}", stderr);
    let report = json(&stdout);
    assert_eq!(report["gaps"], serde_json::json!(["fractions", "math"]));
    assert_eq!(report["relatedItemIds"], serde_json::json!(["q1", "q2", "q3"]));
}

#[test]
fn gaps_default_to_the_review_log() {
    let (_tmp, db) = setup_store();

    let (_, _, success) = run_cli(&db, &["review", "rivers", "--forgot"]);
    assert!(success);

    let (stdout, _, success) = run_cli(&db, &["gaps"]);
    assert!(success);
    let report = json(&stdout);
    assert_eq!(report["gaps"], serde_json::json!(["geography"]));
    assert_eq!(report["relatedItemIds"], serde_json::json!(["rivers"]));
}
