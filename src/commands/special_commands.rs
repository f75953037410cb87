//! Special commands parser for the interactive chat
//!
//! This module parses the slash commands available during a chat session.
//! Special commands let users:
//! - Switch the active schema or SQL dialect
//! - Inspect and re-run query history
//! - Re-submit a follow-up suggestion from the last reply
//! - View session status, clear the conversation, or exit
//!
//! Commands are prefixed with `/` and are case-insensitive.

use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands modify the session state or provide information, rather
/// than being sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Switch the active schema by id
    ///
    /// Invalidates the current session and clears the conversation; stored
    /// history is untouched.
    SwitchSchema(String),

    /// Switch the active SQL dialect
    ///
    /// Invalidates the current session and clears the conversation; stored
    /// history is untouched.
    SwitchDialect(String),

    /// Show stored query history, newest first
    ShowHistory,

    /// Re-run a prompt from history by its 1-based position
    Rerun(usize),

    /// Re-submit a follow-up suggestion from the last reply by 1-based position
    Suggest(usize),

    /// Display current schema, dialect, and session status
    ShowStatus,

    /// Clear the in-memory conversation and start a fresh session
    ClearConversation,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the engine as an utterance.
    None,
}

/// Parse a user input string into a special command
///
/// Checks if the input matches any special command pattern. Commands are
/// case-insensitive.
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None for
/// non-commands.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not
/// a valid command, CommandError::MissingArgument when a required argument is
/// absent, and CommandError::UnsupportedArgument for unparseable arguments.
///
/// # Examples
///
/// ```
/// use sqlwise::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/schema fin-tech").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchSchema("fin-tech".to_string()));
///
/// let cmd = parse_special_command("Show me all users from USA").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/frobnicate").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/schema" => Err(CommandError::MissingArgument {
            command: "/schema".to_string(),
            usage: "/schema <id>".to_string(),
        }),
        input if input.starts_with("/schema ") => {
            Ok(SpecialCommand::SwitchSchema(input[8..].trim().to_string()))
        }

        "/dialect" => Err(CommandError::MissingArgument {
            command: "/dialect".to_string(),
            usage: "/dialect <name>".to_string(),
        }),
        input if input.starts_with("/dialect ") => {
            Ok(SpecialCommand::SwitchDialect(input[9..].trim().to_string()))
        }

        "/history" => Ok(SpecialCommand::ShowHistory),

        "/rerun" => Err(CommandError::MissingArgument {
            command: "/rerun".to_string(),
            usage: "/rerun <n>".to_string(),
        }),
        input if input.starts_with("/rerun ") => {
            parse_index("/rerun", input[7..].trim()).map(SpecialCommand::Rerun)
        }

        "/suggest" => Err(CommandError::MissingArgument {
            command: "/suggest".to_string(),
            usage: "/suggest <n>".to_string(),
        }),
        input if input.starts_with("/suggest ") => {
            parse_index("/suggest", input[9..].trim()).map(SpecialCommand::Suggest)
        }

        "/status" => Ok(SpecialCommand::ShowStatus),
        "/clear" => Ok(SpecialCommand::ClearConversation),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),

        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Parse a 1-based index argument
fn parse_index(command: &str, arg: &str) -> Result<usize, CommandError> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
    }
}

/// Print help information for the interactive chat
pub fn print_help() {
    println!("\n{}", "Available commands:".bold());
    println!("  {}  switch the active schema", "/schema <id>  ".cyan());
    println!("  {}  switch the SQL dialect", "/dialect <name>".cyan());
    println!("  {}  show stored query history", "/history      ".cyan());
    println!("  {}  re-run a history prompt", "/rerun <n>    ".cyan());
    println!(
        "  {}  re-submit a follow-up suggestion",
        "/suggest <n>  ".cyan()
    );
    println!("  {}  show current selection", "/status       ".cyan());
    println!("  {}  clear the conversation", "/clear        ".cyan());
    println!("  {}  show this help", "/help         ".cyan());
    println!("  {}  leave the chat", "/exit         ".cyan());
    println!("\nAnything else is sent to the engine as a data question.\n");
}
