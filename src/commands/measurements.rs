use clap::{Args, Subcommand};
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::commands::OutputFormat;
use crate::models::MeasurementQuery;
use crate::preferences::Units;
use crate::sync::SyncCoordinator;

const KG_PER_LB: f64 = 0.453_592;

#[derive(Args)]
pub struct MeasurementsCommand {
    #[command(subcommand)]
    pub command: MeasurementsSubcommand,
}

#[derive(Subcommand)]
pub enum MeasurementsSubcommand {
    /// List body composition measurements, newest first
    List {
        /// Only include measurements on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Only include measurements on or before this date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Maximum number of rows
        #[arg(long)]
        limit: Option<u32>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Import measurements from a scale export file
    Upload {
        /// Path to an .xlsx, .xls, or .csv export
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl MeasurementsCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            MeasurementsSubcommand::List {
                start_date,
                end_date,
                limit,
                format,
            } => {
                let mut query = MeasurementQuery::new();
                if let Some(date) = start_date {
                    query = query.with_start_date(*date);
                }
                if let Some(date) = end_date {
                    query = query.with_end_date(*date);
                }
                if let Some(limit) = limit {
                    query = query.with_limit(*limit);
                }

                let measurements = coordinator.load_measurements(&query).await?;
                if measurements.is_empty() {
                    println!("No measurements found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&measurements)?);
                    }
                    OutputFormat::Text => {
                        let state = coordinator.store().snapshot().await;
                        let imperial = state.preferences.units == Units::Imperial;
                        let unit = if imperial { "LB" } else { "KG" };

                        println!(
                            "{:<19}  {:>11}  {:>5}  {:>7}  {:>11}",
                            "DATE",
                            format!("WEIGHT ({})", unit),
                            "BMI",
                            "FAT %",
                            format!("MUSCLE ({})", unit),
                        );
                        println!("{}", "-".repeat(62));
                        for m in &measurements {
                            let (weight, muscle) = if imperial {
                                (m.weight_kg / KG_PER_LB, m.muscle_mass_kg / KG_PER_LB)
                            } else {
                                (m.weight_kg, m.muscle_mass_kg)
                            };
                            println!(
                                "{:<19}  {:>11.1}  {:>5.1}  {:>7.1}  {:>11.1}",
                                m.date.format("%Y-%m-%d %H:%M:%S"),
                                weight,
                                m.bmi,
                                m.body_fat_percent,
                                muscle,
                            );
                        }
                        println!("\nTotal: {} measurement(s)", measurements.len());
                    }
                }
                Ok(())
            }

            MeasurementsSubcommand::Upload { file, format } => {
                let extension = file
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase())
                    .unwrap_or_default();
                if !matches!(extension.as_str(), "xlsx" | "xls" | "csv") {
                    return Err("Only .xlsx, .xls, or .csv files can be imported".into());
                }

                let filename = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or("Invalid file name")?
                    .to_string();
                let data = std::fs::read(file)?;

                let receipt = coordinator.upload_measurements(&filename, data).await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&receipt)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", receipt.message);
                        if let Some(count) = receipt.records_count {
                            println!("Imported: {} record(s)", count);
                        }
                        if let Some(range) = &receipt.date_range {
                            println!("Covered:  {} to {}", range.start, range.end);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
