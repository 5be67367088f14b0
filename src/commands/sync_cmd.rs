//! Sync CLI commands for refreshing local data from the server.

use clap::Args;
use serde_json::json;

use crate::commands::OutputFormat;
use crate::sync::SyncCoordinator;

/// Refresh measurements, photos, and the summary from the server
#[derive(Args)]
pub struct SyncCommand {
    /// Refresh even if local data is still fresh
    #[arg(long, short)]
    force: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl SyncCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let refreshed = if self.force {
            coordinator.refresh_all().await?;
            true
        } else {
            coordinator.refresh_if_stale().await?
        };

        let state = coordinator.store().snapshot().await;
        match self.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "refreshed": refreshed,
                        "measurements": state.measurements.len(),
                        "photos": state.photos.len(),
                        "last_sync_at": state.last_sync_at,
                    }))?
                );
            }
            OutputFormat::Text => {
                if refreshed {
                    println!(
                        "Synced {} measurement(s) and {} photo(s)",
                        state.measurements.len(),
                        state.photos.len()
                    );
                } else {
                    println!("Already up to date.");
                }
                if let Some(at) = state.last_sync_at {
                    println!("Last sync: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
                }
            }
        }
        Ok(())
    }
}

/// Show connection status and local data counts
#[derive(Args)]
pub struct StatusCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl StatusCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let online = coordinator.check_online().await;
        let state = coordinator.store().snapshot().await;
        let stale = coordinator.needs_refresh().await;

        match self.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "backend": coordinator.api().base_url(),
                        "online": online,
                        "measurements": state.measurements.len(),
                        "photos": state.photos.len(),
                        "last_sync_at": state.last_sync_at,
                        "needs_refresh": stale,
                        "preferences": state.preferences,
                    }))?
                );
            }
            OutputFormat::Text => {
                println!("Trackify Status");
                println!("===============\n");

                println!("Backend:       {}", coordinator.api().base_url());
                println!(
                    "Connection:    {}",
                    if online { "online" } else { "offline" }
                );
                match state.last_sync_at {
                    Some(at) => {
                        println!("Last sync:     {}", at.format("%Y-%m-%d %H:%M:%S UTC"))
                    }
                    None => println!("Last sync:     never"),
                }
                println!(
                    "Local data:    {} measurement(s), {} photo(s)",
                    state.measurements.len(),
                    state.photos.len()
                );
                if let Some(error) = &state.status.error {
                    println!("Last error:    {}", error);
                }

                println!();
                println!("Theme:         {}", state.preferences.theme);
                println!("Units:         {}", state.preferences.units);
                println!("Range days:    {}", state.preferences.default_range_days);
                println!(
                    "Chart metrics: {}",
                    state.preferences.chart_metrics.join(", ")
                );

                if stale {
                    println!("\nRun 'trackify sync' to refresh.");
                }
            }
        }
        Ok(())
    }
}
