use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackify::commands::{
    AnalyticsCommand, ConfigCommand, ExportCommand, MeasurementsCommand, PhotosCommand,
    PrefsCommand, StatusCommand, SummaryCommand, SyncCommand,
};
use trackify::{ApiClient, AppStore, Config, PreferencesStore, SyncCoordinator};

#[derive(Parser)]
#[command(name = "trackify")]
#[command(version)]
#[command(about = "A body composition tracking CLI", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh all data from the backend
    Sync(SyncCommand),

    /// Show connection and data status
    Status(StatusCommand),

    /// Browse and import body measurements
    Measurements(MeasurementsCommand),

    /// Browse, upload, and delete progress photos
    Photos(PhotosCommand),

    /// Show the fitness summary
    Summary(SummaryCommand),

    /// Analyze trends, predictions, goals, and correlations
    Analytics(AnalyticsCommand),

    /// Export data as CSV or a progress report
    Export(ExportCommand),

    /// Show or change user preferences
    Prefs(PrefsCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trackify=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Sync(cmd)) => {
            let coordinator = build_coordinator(&config)?;
            coordinator.load_preferences().await;
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Status(cmd)) => {
            let coordinator = build_coordinator(&config)?;
            coordinator.load_preferences().await;
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Measurements(cmd)) => {
            let coordinator = build_coordinator(&config)?;
            coordinator.load_preferences().await;
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Photos(cmd)) => {
            let coordinator = build_coordinator(&config)?;
            coordinator.load_preferences().await;
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Summary(cmd)) => {
            let coordinator = build_coordinator(&config)?;
            coordinator.load_preferences().await;
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Analytics(cmd)) => {
            let coordinator = build_coordinator(&config)?;
            coordinator.load_preferences().await;
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Export(cmd)) => {
            let coordinator = build_coordinator(&config)?;
            coordinator.load_preferences().await;
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Prefs(cmd)) => {
            let coordinator = build_coordinator(&config)?;
            coordinator.load_preferences().await;
            cmd.run(&coordinator).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Builds the coordinator the data commands run against.
fn build_coordinator(config: &Config) -> Result<SyncCoordinator, Box<dyn std::error::Error>> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    let api = ApiClient::with_client(&config.api_url, http);
    let store = Arc::new(AppStore::new());
    let preferences = PreferencesStore::new(config.preferences_path());
    Ok(SyncCoordinator::new(api, store, preferences))
}
