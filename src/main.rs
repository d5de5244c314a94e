use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use weather_locations::{
    ApiKey, AppConfig, FjallSettingsStore, HttpLocationService, Location, LocationListSynchronizer,
    RemoveTarget, Status, telemetry,
};

#[derive(Parser)]
#[command(name = "weather-locations", version, about = "Weather for your saved locations")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show all locations
    List,
    /// Add a location (random unless name, status and temperature are given)
    Add {
        #[arg(long, requires_all = ["status", "temperature"])]
        name: Option<String>,
        #[arg(long, requires = "name")]
        status: Option<Status>,
        #[arg(long, requires = "name", allow_hyphen_values = true)]
        temperature: Option<i32>,
    },
    /// Remove a location by list position or id
    Remove {
        /// Position as shown by `list`
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        index: Option<usize>,
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    telemetry::init_tracing(&config.logging)?;

    let settings_path = PathBuf::from(&config.storage.settings_path);
    if let Some(parent) = settings_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create settings directory: {}", parent.display())
        })?;
    }
    let store = FjallSettingsStore::open(&settings_path)
        .with_context(|| format!("Failed to open settings at {}", settings_path.display()))?;
    let api_key = ApiKey::load_or_create(&store).await?;

    let service = HttpLocationService::new(&config.service, api_key)?;
    debug!("Using {}", service.collection_url());
    let sync = LocationListSynchronizer::new(Arc::new(service));

    let outcome = match cli.command.unwrap_or(Command::List) {
        Command::List => sync.refresh().await,
        Command::Add {
            name,
            status,
            temperature,
        } => {
            let location = match (name, status, temperature) {
                (Some(name), Some(status), Some(temperature)) => {
                    Location::new(name, status, temperature)
                }
                _ => Location::random(),
            };
            println!("Adding {location}");
            sync.add(location).await
        }
        Command::Remove { index, id } => {
            let target = match (index, id) {
                (_, Some(id)) => RemoveTarget::Id(id),
                (Some(index), None) => RemoveTarget::Index(index),
                (None, None) => anyhow::bail!("Provide a list index or --id"),
            };
            // Resolve the target against the server's list, as `list` shows it.
            match sync.refresh().await {
                Ok(()) => sync.remove(target).await,
                Err(err) => Err(err),
            }
        }
    };

    print_list(&sync.entries());
    if let Err(err) = outcome {
        let message = sync.last_error().unwrap_or_else(|| err.user_message());
        anyhow::bail!("{message}");
    }
    Ok(())
}

fn print_list(entries: &[Location]) {
    if entries.is_empty() {
        println!("No locations");
        return;
    }
    for (index, location) in entries.iter().enumerate() {
        println!("{index:>3}  {location}  ({})", location.status.tone());
    }
}
