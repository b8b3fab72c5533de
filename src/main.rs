//! tomo-sidebar - conversation sidebar CLI
//!
#![doc = "Main entry point for the tomo-sidebar command-line client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tomo_sidebar::cli::{Cli, Commands};
use tomo_sidebar::commands;
use tomo_sidebar::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::List { json } => {
            tracing::info!("Listing conversations");
            commands::conversations::list(&config, json).await?;
        }
        Commands::Search { query } => {
            tracing::info!("Searching conversations");
            commands::conversations::search(&config, &query).await?;
        }
        Commands::Star { id } => {
            tracing::info!("Toggling star on {}", id);
            commands::conversations::star(&config, &id).await?;
        }
        Commands::Rename { id, title } => {
            tracing::info!("Renaming {}", id);
            commands::conversations::rename(&config, &id, &title).await?;
        }
        Commands::Delete { id } => {
            tracing::info!("Deleting {}", id);
            commands::conversations::delete(&config, &id).await?;
        }
        Commands::DeleteAll { yes } => {
            tracing::info!("Deleting all conversations");
            commands::conversations::delete_all(&config, yes).await?;
        }
        Commands::Whoami => {
            commands::session::whoami(&config).await?;
        }
        Commands::Logout { yes } => {
            tracing::info!("Logging out");
            commands::session::logout(&config, yes).await?;
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "tomo_sidebar=debug"
    } else {
        "tomo_sidebar=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
