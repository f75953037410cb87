//! History persistence integration tests
//!
//! Exercises the store across real process-style reopen cycles: capping,
//! ordering, corruption recovery, and the environment override used by the
//! CLI.

use serial_test::serial;
use tempfile::TempDir;

use sqlwise::catalog::Dialect;
use sqlwise::history::{HistoryEntry, HistoryStore, HISTORY_CAP, HISTORY_PATH_ENV};

fn entry(prompt: &str, sql: &str) -> HistoryEntry {
    HistoryEntry::new(prompt, sql, Dialect::PostgreSql, "ml-ops", None)
}

#[test]
fn test_fifty_one_generations_keep_fifty_newest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");

    {
        let mut store = HistoryStore::open_at(&path).unwrap();
        for i in 0..51 {
            store
                .record(entry(&format!("prompt {}", i), &format!("SELECT {}", i)))
                .unwrap();
        }
        assert_eq!(store.len(), HISTORY_CAP);
    }

    // The cap survives a reload, newest first, oldest gone
    let store = HistoryStore::open_at(&path).unwrap();
    assert_eq!(store.len(), HISTORY_CAP);
    assert_eq!(store.entries()[0].prompt, "prompt 50");
    assert_eq!(store.entries()[HISTORY_CAP - 1].prompt, "prompt 1");
    assert!(!store.entries().iter().any(|e| e.prompt == "prompt 0"));
}

#[test]
fn test_ordering_is_persisted_order_not_resorted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");

    {
        let mut store = HistoryStore::open_at(&path).unwrap();
        store.record(entry("alpha", "SELECT 'a'")).unwrap();
        store.record(entry("beta", "SELECT 'b'")).unwrap();
        store.record(entry("gamma", "SELECT 'c'")).unwrap();
    }

    let store = HistoryStore::open_at(&path).unwrap();
    let prompts: Vec<&str> = store.entries().iter().map(|e| e.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["gamma", "beta", "alpha"]);
}

#[test]
fn test_mixed_dialects_and_schemas_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");

    {
        let mut store = HistoryStore::open_at(&path).unwrap();
        store
            .record(HistoryEntry::new(
                "sensors per district",
                "SELECT count(*) FROM sensors",
                Dialect::ClickHouse,
                "iot-mesh",
                None,
            ))
            .unwrap();
        store
            .record(HistoryEntry::new(
                "balance by currency",
                "SELECT currency, sum(balance) FROM accounts GROUP BY currency",
                Dialect::BigQuery,
                "fin-tech",
                Some(vec!["Step 1: Grouped by currency.".to_string()]),
            ))
            .unwrap();
    }

    let store = HistoryStore::open_at(&path).unwrap();
    assert_eq!(store.entries()[0].dialect, Dialect::BigQuery);
    assert_eq!(store.entries()[0].schema_id, "fin-tech");
    assert_eq!(
        store.entries()[0].reasoning,
        Some(vec!["Step 1: Grouped by currency.".to_string()])
    );
    assert_eq!(store.entries()[1].dialect, Dialect::ClickHouse);
    assert_eq!(store.entries()[1].schema_id, "iot-mesh");
}

#[test]
fn test_corrupt_state_is_empty_history_and_recovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, "▒▒ not json at all ▒▒").unwrap();

    // Corruption is silently "no history"
    let mut store = HistoryStore::open_at(&path).unwrap();
    assert!(store.is_empty());

    // The next record overwrites the corrupt file with valid state
    store.record(entry("fresh", "SELECT 1")).unwrap();
    let store = HistoryStore::open_at(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.entries()[0].prompt, "fresh");
}

#[test]
fn test_ids_are_unique_across_entries() {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::open_at(dir.path().join("history.json")).unwrap();

    for i in 0..5 {
        store
            .record(entry(&format!("p{}", i), &format!("SELECT {}", i)))
            .unwrap();
    }

    let mut ids: Vec<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
#[serial]
fn test_env_override_selects_history_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("elsewhere").join("history.json");

    std::env::set_var(HISTORY_PATH_ENV, &path);
    let result = (|| -> sqlwise::Result<()> {
        let mut store = HistoryStore::open()?;
        store.record(entry("via env", "SELECT 1"))?;
        Ok(())
    })();
    std::env::remove_var(HISTORY_PATH_ENV);
    result.unwrap();

    assert!(path.exists());
    let store = HistoryStore::open_at(&path).unwrap();
    assert_eq!(store.entries()[0].prompt, "via env");
}
