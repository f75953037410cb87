//! Schema catalog and SQL dialect definitions
//!
//! The catalog is a static, immutable collection of named database schemas
//! loaded at startup. Each schema carries an ordered list of tables and
//! columns; the serialized form of a schema is embedded verbatim into the
//! session's system instruction so the engine can map natural language onto
//! real table and column names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SqlwiseError;

/// A single column of a table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Engine type string, e.g. "UUID" or "DECIMAL(15,2)"
    #[serde(rename = "type")]
    pub column_type: String,
    /// Optional human description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Column {
    /// Create a new column
    ///
    /// # Arguments
    ///
    /// * `name` - Column name
    /// * `column_type` - Engine type string
    /// * `description` - Optional human description
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwise::catalog::Column;
    ///
    /// let col = Column::new("id", "UUID", Some("Primary key"));
    /// assert_eq!(col.column_type, "UUID");
    /// ```
    pub fn new(
        name: impl Into<String>,
        column_type: impl Into<String>,
        description: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            description: description.map(|d| d.to_string()),
        }
    }
}

/// A table with an ordered list of columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    /// Table name, unique within its schema
    pub name: String,
    /// Ordered columns
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a new table
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// A named database schema
///
/// Immutable after load. The `id` is the stable key used by history entries
/// and session bindings; `name` and `description` are display strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schema {
    /// Unique stable identifier, e.g. "ml-ops"
    pub id: String,
    /// Display name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Ordered tables
    pub tables: Vec<Table>,
}

impl Schema {
    /// Create a new schema
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tables: Vec<Table>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tables,
        }
    }
}

/// Supported SQL engine flavors
///
/// The display names are the canonical spellings used in prompts, history
/// entries, and the persisted JSON format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "PostgreSQL")]
    PostgreSql,
    #[serde(rename = "MySQL")]
    MySql,
    #[serde(rename = "SQLite")]
    Sqlite,
    #[serde(rename = "Snowflake")]
    Snowflake,
    #[serde(rename = "BigQuery")]
    BigQuery,
    #[serde(rename = "ClickHouse")]
    ClickHouse,
}

impl Dialect {
    /// The ordered list of dialects offered for selection
    ///
    /// SQLite stays parseable for stored history from older builds but is not
    /// offered in the selection list.
    pub const SELECTABLE: [Dialect; 5] = [
        Dialect::PostgreSql,
        Dialect::BigQuery,
        Dialect::Snowflake,
        Dialect::ClickHouse,
        Dialect::MySql,
    ];
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::PostgreSql
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PostgreSql => "PostgreSQL",
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
            Self::Snowflake => "Snowflake",
            Self::BigQuery => "BigQuery",
            Self::ClickHouse => "ClickHouse",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Dialect {
    type Err = SqlwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(Self::PostgreSql),
            "mysql" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            "snowflake" => Ok(Self::Snowflake),
            "bigquery" => Ok(Self::BigQuery),
            "clickhouse" => Ok(Self::ClickHouse),
            other => Err(SqlwiseError::UnknownDialect(other.to_string())),
        }
    }
}

/// Static collection of schemas available for querying
#[derive(Debug, Clone)]
pub struct Catalog {
    schemas: Vec<Schema>,
}

impl Catalog {
    /// Build the compiled-in catalog
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlwise::catalog::Catalog;
    ///
    /// let catalog = Catalog::builtin();
    /// assert!(catalog.get("ml-ops").is_some());
    /// ```
    pub fn builtin() -> Self {
        Self {
            schemas: vec![ml_ops_schema(), iot_mesh_schema(), fin_tech_schema()],
        }
    }

    /// All schemas in catalog order
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// Look up a schema by id
    pub fn get(&self, id: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.id == id)
    }

    /// The schema selected when none is specified
    pub fn default_schema(&self) -> &Schema {
        // builtin() guarantees a non-empty catalog
        &self.schemas[0]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn ml_ops_schema() -> Schema {
    Schema::new(
        "ml-ops",
        "Neural Experiment Tracking",
        "Schema for tracking deep learning model training, metrics, and hyperparameter tuning.",
        vec![
            Table::new(
                "experiments",
                vec![
                    Column::new("id", "UUID", Some("Primary key")),
                    Column::new("name", "VARCHAR", Some("Experiment name")),
                    Column::new("created_at", "TIMESTAMP", Some("Creation time")),
                ],
            ),
            Table::new(
                "runs",
                vec![
                    Column::new("id", "UUID", Some("Run identifier")),
                    Column::new("experiment_id", "UUID", Some("FK to experiments")),
                    Column::new("status", "VARCHAR", Some("running, failed, finished")),
                    Column::new("duration_seconds", "INTEGER", Some("Train time")),
                ],
            ),
            Table::new(
                "metrics",
                vec![
                    Column::new("run_id", "UUID", Some("FK to runs")),
                    Column::new("step", "INTEGER", Some("Epoch or step index")),
                    Column::new("loss", "FLOAT", Some("Loss value")),
                    Column::new("accuracy", "FLOAT", Some("Accuracy value")),
                ],
            ),
        ],
    )
}

fn iot_mesh_schema() -> Schema {
    Schema::new(
        "iot-mesh",
        "Smart City Sensor Mesh",
        "High-velocity telemetry data from urban IoT infrastructure.",
        vec![
            Table::new(
                "sensors",
                vec![
                    Column::new("sensor_id", "SERIAL", Some("Unique ID")),
                    Column::new("type", "VARCHAR", Some("Air, Traffic, Noise")),
                    Column::new("latitude", "DECIMAL", Some("Geo location")),
                    Column::new("longitude", "DECIMAL", Some("Geo location")),
                ],
            ),
            Table::new(
                "readings",
                vec![
                    Column::new("sensor_id", "INTEGER", Some("FK")),
                    Column::new("timestamp", "TIMESTAMP", Some("Event time")),
                    Column::new("value", "DOUBLE", Some("Measurement")),
                    Column::new("unit", "VARCHAR", Some("ppm, db, kmh")),
                ],
            ),
        ],
    )
}

fn fin_tech_schema() -> Schema {
    Schema::new(
        "fin-tech",
        "NeoBank Transaction Core",
        "Banking ledger and user account management systems.",
        vec![
            Table::new(
                "accounts",
                vec![
                    Column::new("acc_no", "VARCHAR", Some("IBAN/Account")),
                    Column::new("user_id", "INTEGER", Some("Owner")),
                    Column::new("balance", "DECIMAL(15,2)", Some("Current funds")),
                    Column::new("currency", "CHAR(3)", Some("USD, EUR, GBP")),
                ],
            ),
            Table::new(
                "transactions",
                vec![
                    Column::new("id", "BIGINT", Some("PK")),
                    Column::new("from_acc", "VARCHAR", Some("Sender")),
                    Column::new("to_acc", "VARCHAR", Some("Receiver")),
                    Column::new("amount", "DECIMAL", Some("Sum")),
                    Column::new("category", "VARCHAR", Some("Food, Tech, Rent")),
                ],
            ),
        ],
    )
}
