//! History management command

use colored::Colorize;
use prettytable::{format, Table};
use std::path::Path;

use crate::cli::HistoryCommand;
use crate::error::Result;
use crate::history::{HistoryEntry, HistoryStore};

/// Handle history commands
///
/// # Arguments
///
/// * `command` - The subcommand to run
/// * `path_override` - Optional history file location from the CLI
pub fn handle_history(command: HistoryCommand, path_override: Option<&Path>) -> Result<()> {
    let mut store = open_store(path_override)?;

    match command {
        HistoryCommand::List => {
            if store.is_empty() {
                println!("{}", "No query history found.".yellow());
                return Ok(());
            }
            print_entries(store.entries());
        }
        HistoryCommand::Clear => {
            let dropped = store.len();
            store.clear()?;
            println!("{}", format!("Cleared {} history entries", dropped).green());
        }
    }

    Ok(())
}

fn open_store(path_override: Option<&Path>) -> Result<HistoryStore> {
    match path_override {
        Some(path) => HistoryStore::open_at(path),
        None => HistoryStore::open(),
    }
}

/// Render history entries as a table, newest first
pub fn print_entries(entries: &[HistoryEntry]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "#".bold(),
        "When".bold(),
        "Dialect".bold(),
        "Schema".bold(),
        "Prompt".bold(),
        "SQL".bold()
    ]);

    for (idx, entry) in entries.iter().enumerate() {
        table.add_row(prettytable::row![
            idx + 1,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.dialect.to_string().cyan(),
            entry.schema_id,
            truncate(&entry.prompt, 40),
            truncate(&entry.sql, 48)
        ]);
    }

    println!("\nQuery history:");
    table.printstd();
    println!();
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Dialect;
    use tempfile::TempDir;

    #[test]
    fn test_handle_history_list_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        assert!(handle_history(HistoryCommand::List, Some(&path)).is_ok());
    }

    #[test]
    fn test_handle_history_clear() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        {
            let mut store = HistoryStore::open_at(&path).unwrap();
            store
                .record(HistoryEntry::new(
                    "q",
                    "SELECT 1",
                    Dialect::PostgreSql,
                    "ml-ops",
                    None,
                ))
                .unwrap();
        }

        assert!(handle_history(HistoryCommand::Clear, Some(&path)).is_ok());
        let store = HistoryStore::open_at(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_text() {
        let out = truncate("a very long prompt indeed", 10);
        assert_eq!(out, "a very ...");
        assert_eq!(out.chars().count(), 10);
    }
}
