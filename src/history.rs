//! Capped, persisted query history
//!
//! The history store is a durable, size-bounded record of past successful
//! generations, newest first. It is persisted as a single JSON array on
//! every change and loaded once at startup. Absent state means no history;
//! corrupt state also means no history, but is logged distinctly so an
//! operator can tell the two apart.
//!
//! There is a single writer and the read-modify-write happens synchronously
//! inside one interaction, so last-write-wins without merge logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ulid::Ulid;

use crate::catalog::Dialect;
use crate::error::{Result, SqlwiseError};

/// Maximum number of retained entries; oldest beyond this are dropped
pub const HISTORY_CAP: usize = 50;

/// Environment variable overriding the history file location
///
/// Useful for tests and for pointing the binary at an alternate file
/// without touching the user's data directory.
pub const HISTORY_PATH_ENV: &str = "SQLWISE_HISTORY_PATH";

/// Persisted record of one completed prompt-to-SQL generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Time-ordered unique id
    pub id: String,
    /// The natural-language request
    pub prompt: String,
    /// The generated SQL (never empty in a stored entry)
    pub sql: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Dialect the SQL targets
    pub dialect: Dialect,
    /// Schema the session was bound to
    pub schema_id: String,
    /// Reasoning steps, when the engine provided them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Vec<String>>,
}

impl HistoryEntry {
    /// Create a new entry stamped with the current time and a fresh ULID
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwise::catalog::Dialect;
    /// use sqlwise::history::HistoryEntry;
    ///
    /// let entry = HistoryEntry::new(
    ///     "Show me all users from USA",
    ///     "SELECT * FROM users WHERE country='USA'",
    ///     Dialect::PostgreSql,
    ///     "ml-ops",
    ///     None,
    /// );
    /// assert_eq!(entry.schema_id, "ml-ops");
    /// ```
    pub fn new(
        prompt: impl Into<String>,
        sql: impl Into<String>,
        dialect: Dialect,
        schema_id: impl Into<String>,
        reasoning: Option<Vec<String>>,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            prompt: prompt.into(),
            sql: sql.into(),
            timestamp: Utc::now(),
            dialect,
            schema_id: schema_id.into(),
            reasoning,
        }
    }
}

/// File-backed history store, newest entry first
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Open the store at its default location
    ///
    /// Honors the `SQLWISE_HISTORY_PATH` override; otherwise the file lives
    /// in the platform data directory.
    pub fn open() -> Result<Self> {
        if let Ok(override_path) = std::env::var(HISTORY_PATH_ENV) {
            return Self::open_at(override_path);
        }

        let proj_dirs = directories::ProjectDirs::from("com", "sqlwise", "sqlwise")
            .ok_or_else(|| SqlwiseError::Storage("Could not determine data directory".into()))?;

        Self::open_at(proj_dirs.data_dir().join("history.json"))
    }

    /// Open the store at a specific path, creating parent directories
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sqlwise::history::HistoryStore;
    ///
    /// let store = HistoryStore::open_at("/tmp/sqlwise_history.json").unwrap();
    /// assert!(store.is_empty());
    /// ```
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SqlwiseError::Storage(format!("Failed to create history directory: {}", e))
            })?;
        }

        let entries = load_entries(&path);
        Ok(Self { path, entries })
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend an entry, cap the list, and persist
    ///
    /// Entries with empty `sql` are a no-op: only generations that actually
    /// produced a query are worth recalling.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<()> {
        if entry.sql.is_empty() {
            tracing::debug!("skipping history entry with empty sql");
            return Ok(());
        }

        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAP);
        self.persist()
    }

    /// Remove all entries and persist the empty list
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| SqlwiseError::Storage(format!("Failed to serialize history: {}", e)))?;
        std::fs::write(&self.path, json)
            .map_err(|e| SqlwiseError::Storage(format!("Failed to write history: {}", e)))?;
        tracing::debug!(
            "persisted {} history entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Load entries from disk
///
/// An absent file is the normal first-run case. A file that exists but does
/// not parse is treated as empty history too, with a distinct warning so
/// corruption is observable without ever being fatal.
fn load_entries(path: &Path) -> Vec<HistoryEntry> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no history file at {}, starting empty", path.display());
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("failed to read history at {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                "history file at {} is corrupt ({}); treating as empty",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}
