use clap::{Args, Subcommand};
use chrono::NaiveDate;

use crate::commands::OutputFormat;
use crate::sync::SyncCoordinator;

#[derive(Args)]
pub struct ExportCommand {
    #[command(subcommand)]
    pub command: ExportSubcommand,
}

#[derive(Subcommand)]
pub enum ExportSubcommand {
    /// Export measurements to a server-side CSV file
    Csv {
        /// Only include measurements on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Only include measurements on or before this date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },

    /// Build a progress report for a date range
    Report {
        /// Report start (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// Report end (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,

        /// Include the photo timeline in the report
        #[arg(long)]
        include_photos: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ExportCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ExportSubcommand::Csv {
                start_date,
                end_date,
            } => {
                let result = coordinator.api().export_csv(*start_date, *end_date).await?;
                println!(
                    "CSV export ready: {}{}",
                    coordinator.api().base_url(),
                    result.download_url
                );
                Ok(())
            }

            ExportSubcommand::Report {
                start_date,
                end_date,
                include_photos,
                format,
            } => {
                if start_date > end_date {
                    return Err("Start date must not be after end date".into());
                }

                let report = coordinator
                    .api()
                    .export_report(*start_date, *end_date, *include_photos)
                    .await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                    OutputFormat::Text => {
                        println!("Progress Report: {} to {}", start_date, end_date);
                        println!("{}\n", "=".repeat(42));

                        if let Some(summary) = report.summary.as_object() {
                            for (key, value) in summary {
                                println!("{}: {}", key.replace('_', " "), value);
                            }
                            println!();
                        }

                        if let Some(changes) = report.key_changes.as_object() {
                            if !changes.is_empty() {
                                println!("Key changes");
                                for (metric, change) in changes {
                                    println!("  {}: {}", metric, change);
                                }
                                println!();
                            }
                        }

                        if !report.achievements.is_empty() {
                            println!("Achievements");
                            for achievement in &report.achievements {
                                println!("  * {}", achievement.description);
                            }
                            println!();
                        }

                        if !report.health_insights.is_empty() {
                            println!("Insights");
                            for insight in &report.health_insights {
                                println!("  * {}", insight);
                            }
                            println!();
                        }

                        if !report.recommendations.is_empty() {
                            println!("Recommendations");
                            for recommendation in &report.recommendations {
                                println!("  * {}", recommendation);
                            }
                        }

                        if *include_photos {
                            println!(
                                "\nPhoto timeline: {} photo(s)",
                                report.photos_timeline.len()
                            );
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
