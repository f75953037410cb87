/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`    — Interactive natural-language-to-SQL chat
- `schemas` — Schema catalog and dialect listing
- `history` — Stored query history management

These handlers are intentionally small and use the library components:
catalog, session manager, generation client, and history store.
*/

pub mod history;
pub mod schemas;
pub mod special_commands;

pub mod chat {
    //! Interactive chat handler.
    //!
    //! Instantiates the transport and history store, then runs a
    //! readline-based loop that submits user input to the generation client
    //! through the current session. One generation is outstanding at a time:
    //! the loop awaits each reply before reading the next line.

    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::PathBuf;

    use crate::catalog::{Catalog, Dialect, Schema};
    use crate::commands::history::print_entries;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::config::Config;
    use crate::error::{Result, SqlwiseError};
    use crate::generate::{GenerationClient, SqlGeneration};
    use crate::history::{HistoryEntry, HistoryStore};
    use crate::providers::create_transport;
    use crate::session::SessionManager;

    /// Start the interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `schema_id` - Optional starting schema id
    /// * `dialect_name` - Optional starting dialect name
    /// * `provider_name` - Optional override for the configured provider
    /// * `history_path` - Optional override for the history file location
    pub async fn run_chat(
        config: Config,
        schema_id: Option<String>,
        dialect_name: Option<String>,
        provider_name: Option<String>,
        history_path: Option<PathBuf>,
    ) -> Result<()> {
        let catalog = Catalog::builtin();

        let mut schema = resolve_schema(
            &catalog,
            schema_id.as_deref().or(config.chat.schema.as_deref()),
        )?
        .clone();

        let mut dialect = match dialect_name.as_deref().or(config.chat.dialect.as_deref()) {
            Some(name) => name.parse::<Dialect>()?,
            None => Dialect::default(),
        };

        let provider_type = provider_name
            .as_deref()
            .unwrap_or(&config.provider.provider_type);
        let transport = create_transport(provider_type, &config.provider)?;
        let client = GenerationClient::new(transport);

        let mut history = match history_path.or(config.chat.history_path.clone()) {
            Some(path) => HistoryStore::open_at(path)?,
            None => HistoryStore::open()?,
        };

        let mut manager = SessionManager::new();
        manager.ensure(&schema, dialect);

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&schema, dialect, &client.describe_transport());

        loop {
            let prompt = format!(
                "{}{} >> ",
                format!("[{}]", schema.id).cyan(),
                format!("[{}]", dialect).purple()
            );

            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            println!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::SwitchSchema(id) => match catalog.get(&id) {
                            Some(found) => {
                                schema = found.clone();
                                manager.ensure(&schema, dialect);
                                println!(
                                    "Switched to schema {} ({}). Conversation cleared.\n",
                                    schema.id.cyan(),
                                    schema.name
                                );
                            }
                            None => {
                                let known: Vec<&str> =
                                    catalog.schemas().iter().map(|s| s.id.as_str()).collect();
                                println!(
                                    "{}\n",
                                    format!(
                                        "Unknown schema: {} (available: {})",
                                        id,
                                        known.join(", ")
                                    )
                                    .red()
                                );
                            }
                        },
                        SpecialCommand::SwitchDialect(name) => match name.parse::<Dialect>() {
                            Ok(parsed) => {
                                dialect = parsed;
                                manager.ensure(&schema, dialect);
                                println!(
                                    "Switched to dialect {}. Conversation cleared.\n",
                                    dialect.to_string().cyan()
                                );
                            }
                            Err(e) => println!("{}\n", e.to_string().red()),
                        },
                        SpecialCommand::ShowHistory => {
                            if history.is_empty() {
                                println!("{}\n", "No query history yet.".yellow());
                            } else {
                                print_entries(history.entries());
                                println!("Use {} to re-run one.\n", "/rerun <n>".cyan());
                            }
                        }
                        SpecialCommand::Rerun(n) => {
                            match history.entries().get(n - 1).map(|e| e.prompt.clone()) {
                                Some(prompt_text) => {
                                    println!("{} {}", ">>".dimmed(), prompt_text.dimmed());
                                    submit(
                                        &client,
                                        &mut manager,
                                        &mut history,
                                        &schema,
                                        dialect,
                                        &prompt_text,
                                    )
                                    .await;
                                }
                                None => {
                                    println!("{}\n", format!("No history entry #{}", n).red())
                                }
                            }
                        }
                        SpecialCommand::Suggest(n) => {
                            match manager.last_suggestions().get(n - 1).cloned() {
                                Some(suggestion) => {
                                    println!("{} {}", ">>".dimmed(), suggestion.dimmed());
                                    submit(
                                        &client,
                                        &mut manager,
                                        &mut history,
                                        &schema,
                                        dialect,
                                        &suggestion,
                                    )
                                    .await;
                                }
                                None => println!("{}\n", format!("No suggestion #{}", n).red()),
                            }
                        }
                        SpecialCommand::ShowStatus => {
                            print_status(&schema, dialect, &client, &manager, &history);
                        }
                        SpecialCommand::ClearConversation => {
                            manager.clear();
                            manager.ensure(&schema, dialect);
                            println!("Conversation cleared.\n");
                        }
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            rl.add_history_entry(trimmed)?;
                            submit(&client, &mut manager, &mut history, &schema, dialect, trimmed)
                                .await;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        println!("Bye.");
        Ok(())
    }

    fn resolve_schema<'a>(catalog: &'a Catalog, id: Option<&str>) -> Result<&'a Schema> {
        match id {
            Some(id) => catalog
                .get(id)
                .ok_or_else(|| SqlwiseError::UnknownSchema(id.to_string()).into()),
            None => Ok(catalog.default_schema()),
        }
    }

    /// Run one generation and attribute the result
    ///
    /// The session tag captured before the await guards against the reply
    /// landing after the user switched schema or dialect: a stale reply is
    /// dropped instead of being appended under the wrong selection.
    async fn submit(
        client: &GenerationClient,
        manager: &mut SessionManager,
        history: &mut HistoryStore,
        schema: &Schema,
        dialect: Dialect,
        utterance: &str,
    ) {
        let session = manager.ensure(schema, dialect).clone();
        let tag = session.tag();

        println!("{}", "Generating SQL...".dimmed());

        match client.generate(&session, utterance).await {
            Ok(generation) => {
                if !manager.append_exchange(tag, utterance, &generation) {
                    tracing::debug!("dropped reply for superseded session");
                    return;
                }

                render_generation(&generation);

                if !generation.sql.is_empty() {
                    let entry = HistoryEntry::new(
                        utterance,
                        generation.sql.clone(),
                        dialect,
                        schema.id.clone(),
                        if generation.reasoning.is_empty() {
                            None
                        } else {
                            Some(generation.reasoning.clone())
                        },
                    );
                    if let Err(e) = history.record(entry) {
                        tracing::warn!("failed to persist history: {}", e);
                    }
                }
            }
            Err(e) => {
                println!(
                    "{}\n",
                    format!("{}. Please refine your prompt.", e).red()
                );
            }
        }
    }

    fn render_generation(generation: &SqlGeneration) {
        println!();
        for step in &generation.reasoning {
            println!("  {} {}", "·".dimmed(), step.dimmed());
        }
        if !generation.reasoning.is_empty() {
            println!();
        }

        println!("{}", generation.explanation);

        if !generation.sql.is_empty() {
            println!("\n{}", generation.sql.green());
        }

        if !generation.suggestions.is_empty() {
            println!("\n{}", "Follow-ups:".bold());
            for (idx, suggestion) in generation.suggestions.iter().enumerate() {
                println!("  {} {}", format!("[{}]", idx + 1).cyan(), suggestion);
            }
            println!("Use {} to send one.", "/suggest <n>".cyan());
        }
        println!();
    }

    fn print_welcome_banner(schema: &Schema, dialect: Dialect, transport: &str) {
        println!("\n{}", "SQLWise: how can I help you query?".bold());
        println!(
            "Schema: {} ({})  Dialect: {}  Engine: {}",
            schema.id.cyan(),
            schema.name,
            dialect.to_string().purple(),
            transport.dimmed()
        );
        println!("Type {} for commands, {} to leave.\n", "/help".cyan(), "/exit".cyan());
    }

    fn print_status(
        schema: &Schema,
        dialect: Dialect,
        client: &GenerationClient,
        manager: &SessionManager,
        history: &HistoryStore,
    ) {
        println!("\nSchema:   {} ({})", schema.id.cyan(), schema.name);
        println!("Dialect:  {}", dialect.to_string().cyan());
        println!("Engine:   {}", client.describe_transport());
        println!("Messages: {}", manager.messages().len());
        println!("History:  {} stored entries\n", history.len());
    }
}
