use clap::{Args, Subcommand};

use crate::commands::OutputFormat;
use crate::preferences::{Preferences, PreferencesPatch, Theme, Units};
use crate::sync::SyncCoordinator;

#[derive(Args)]
pub struct PrefsCommand {
    #[command(subcommand)]
    pub command: PrefsSubcommand,
}

#[derive(Subcommand)]
pub enum PrefsSubcommand {
    /// Show current preferences
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change one or more preferences
    Set {
        /// Color scheme: light, dark, or system
        #[arg(long)]
        theme: Option<String>,

        /// Unit system: metric or imperial
        #[arg(long)]
        units: Option<String>,

        /// Default analysis window in days
        #[arg(long = "range-days", value_name = "DAYS")]
        range_days: Option<u32>,

        /// Chart metric (can be repeated, replaces the current set)
        #[arg(long = "chart-metric", value_name = "METRIC")]
        chart_metrics: Vec<String>,
    },
}

impl PrefsCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PrefsSubcommand::Show { format } => {
                let state = coordinator.store().snapshot().await;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&state.preferences)?);
                    }
                    OutputFormat::Text => print_preferences(&state.preferences),
                }
                Ok(())
            }

            PrefsSubcommand::Set {
                theme,
                units,
                range_days,
                chart_metrics,
            } => {
                let mut patch = PreferencesPatch::new();
                if let Some(theme) = theme {
                    patch = patch.with_theme(theme.parse::<Theme>()?);
                }
                if let Some(units) = units {
                    patch = patch.with_units(units.parse::<Units>()?);
                }
                if let Some(days) = range_days {
                    if *days == 0 {
                        return Err("Range days must be at least 1".into());
                    }
                    patch = patch.with_default_range_days(*days);
                }
                if !chart_metrics.is_empty() {
                    patch = patch.with_chart_metrics(chart_metrics.clone());
                }

                if patch.is_empty() {
                    return Err("Nothing to set. Provide at least one option.".into());
                }

                let updated = coordinator.merge_preferences(patch).await?;
                println!("Updated preferences:");
                print_preferences(&updated);
                Ok(())
            }
        }
    }
}

fn print_preferences(preferences: &Preferences) {
    println!("Theme:         {}", preferences.theme);
    println!("Units:         {}", preferences.units);
    println!("Range days:    {}", preferences.default_range_days);
    println!("Chart metrics: {}", preferences.chart_metrics.join(", "));
}
