//! SQLWise - conversational natural-language-to-SQL CLI
//!
//! Main entry point for the SQLWise application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sqlwise::catalog::Catalog;
use sqlwise::cli::{Cli, Commands};
use sqlwise::commands;
use sqlwise::config::Config;
use sqlwise::history::HISTORY_PATH_ENV;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Mirror a CLI history path override into the environment so
    // HistoryStore::open() picks it up without threading the path through
    // every call site.
    if let Some(path) = &cli.history_path {
        std::env::set_var(HISTORY_PATH_ENV, path);
        tracing::info!("Using history path override from CLI: {}", path.display());
    }

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;
    config.validate()?;

    match cli.command {
        Commands::Chat {
            schema,
            dialect,
            provider,
        } => {
            tracing::info!("Starting interactive chat");
            if let Some(p) = &provider {
                tracing::debug!("Using provider override: {}", p);
            }
            commands::chat::run_chat(config, schema, dialect, provider, cli.history_path).await?;
            Ok(())
        }
        Commands::Schemas { id } => {
            let catalog = Catalog::builtin();
            commands::schemas::handle_schemas(&catalog, id.as_deref())?;
            Ok(())
        }
        Commands::Dialects => {
            commands::schemas::handle_dialects();
            Ok(())
        }
        Commands::History { command } => {
            commands::history::handle_history(command, cli.history_path.as_deref())?;
            Ok(())
        }
    }
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug level for
/// this crate and warnings stay quiet enough for interactive use.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sqlwise=debug" } else { "sqlwise=info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
