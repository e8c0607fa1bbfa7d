mod admin;
mod cart;
mod catalog;
mod export;

use clap::{Parser, Subcommand};
use lumizo_api::LumizoClient;
use lumizo_core::{load_app_config, AppConfig};
use tracing_subscriber::EnvFilter;

use admin::AdminCommands;
use cart::CartCommands;
use catalog::CatalogCommands;
use export::ExportCommands;

#[derive(Debug, Parser)]
#[command(name = "lumizo")]
#[command(about = "Lumizo lighting catalog command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse and filter the public catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Manage the local quote cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Export PDF documents
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Catalog administration against the REST API
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Catalog { command }) => catalog::run(&config, command).await,
        Some(Commands::Cart { command }) => cart::run(&config, command).await,
        Some(Commands::Export { command }) => export::run(&config, command).await,
        Some(Commands::Admin { command }) => admin::run(&config, command).await,
        None => {
            println!(
                "lumizo ready ({} environment, API at {})",
                config.env, config.api_base_url
            );
            Ok(())
        }
    }
}

/// Builds the API client with the configured timeout and retry policy.
fn api_client(config: &AppConfig) -> anyhow::Result<LumizoClient> {
    Ok(LumizoClient::new(config)?)
}

/// Display helper for optional values, `"-"` when absent.
fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
