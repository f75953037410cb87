//! Command-line interface definition for SQLWise
//!
//! This module defines the CLI structure using clap's derive API, providing
//! commands for the interactive chat, schema browsing, and history
//! management.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SQLWise - conversational natural-language-to-SQL assistant
///
/// Describe a data question in plain language and get back SQL for the
/// selected schema and dialect, with the engine's reasoning and follow-up
/// suggestions.
#[derive(Parser, Debug, Clone)]
#[command(name = "sqlwise")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the history file location
    #[arg(long)]
    pub history_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for SQLWise
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive chat
    Chat {
        /// Schema id to start with (see `sqlwise schemas`)
        #[arg(short, long)]
        schema: Option<String>,

        /// SQL dialect to start with (see `sqlwise dialects`)
        #[arg(short, long)]
        dialect: Option<String>,

        /// Override the provider from config (ollama, gemini)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// List available schemas, or show one schema's tables
    Schemas {
        /// Schema id to show in detail
        #[arg(long)]
        id: Option<String>,
    },

    /// List supported SQL dialects
    Dialects,

    /// Manage query history
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List stored history entries, newest first
    List,

    /// Delete all stored history entries
    Clear,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
