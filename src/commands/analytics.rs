use clap::{Args, Subcommand};
use chrono::{Local, NaiveDate};

use crate::commands::OutputFormat;
use crate::models::TrendQuery;
use crate::sync::SyncCoordinator;

#[derive(Args)]
pub struct AnalyticsCommand {
    #[command(subcommand)]
    pub command: AnalyticsSubcommand,
}

#[derive(Subcommand)]
pub enum AnalyticsSubcommand {
    /// Analyze metric trends over a date window
    Trends {
        /// Window start (YYYY-MM-DD); defaults to the preferred range back
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Window end (YYYY-MM-DD); defaults to today
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Metric to analyze (can be repeated)
        #[arg(long = "metric", value_name = "METRIC")]
        metrics: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Project metrics forward from recent trends
    Predictions {
        /// How many days ahead to project
        #[arg(long, default_value_t = 30)]
        days: u32,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Evaluate a weight goal against the current trend
    Goal {
        /// Target weight in kilograms
        #[arg(long)]
        target_weight: f64,

        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        target_date: NaiveDate,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show strongly correlated metric pairs
    Correlations {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl AnalyticsCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AnalyticsSubcommand::Trends {
                start_date,
                end_date,
                metrics,
                format,
            } => {
                let state = coordinator.store().snapshot().await;
                let end = end_date.unwrap_or_else(|| Local::now().date_naive());
                let start = start_date.unwrap_or_else(|| {
                    end - chrono::Duration::days(state.preferences.default_range_days as i64)
                });
                if start > end {
                    return Err("Start date must not be after end date".into());
                }

                let mut query = TrendQuery::new(start, end);
                if !metrics.is_empty() {
                    query = query.with_metrics(metrics.clone());
                }
                let report = coordinator.api().get_trend_analysis(&query).await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "Trend Analysis: {} to {} ({} day(s), {} reading(s))\n",
                            report.period.start,
                            report.period.end,
                            report.period.duration_days,
                            report.period.data_points,
                        );

                        if report.metrics_analysis.is_empty() {
                            println!("No metrics had enough data in this window");
                            return Ok(());
                        }

                        println!(
                            "{:<24}  {:>8}  {:>8}  {:>8}  {:>8}",
                            "METRIC", "CURRENT", "CHANGE", "CHANGE %", "SLOPE"
                        );
                        println!("{}", "-".repeat(64));
                        let mut rows: Vec<_> = report.metrics_analysis.iter().collect();
                        rows.sort_by(|a, b| a.0.cmp(b.0));
                        for (metric, analysis) in rows {
                            println!(
                                "{:<24}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.2}",
                                metric,
                                analysis.current,
                                analysis.total_change,
                                analysis.total_change_percent,
                                analysis.trend_slope,
                            );
                        }

                        if !report.correlations.is_empty() {
                            println!("\nCorrelations");
                            let mut pairs: Vec<_> = report.correlations.iter().collect();
                            pairs.sort_by(|a, b| a.0.cmp(b.0));
                            for (pair, r) in pairs {
                                println!("  {}: {:.2}", pair, r);
                            }
                        }
                    }
                }
                Ok(())
            }

            AnalyticsSubcommand::Predictions { days, format } => {
                let report = coordinator.api().get_predictions(*days).await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "Predictions: {} day(s) ahead, based on {} reading(s)\n",
                            report.prediction_period, report.base_data_points,
                        );

                        if report.predictions.is_empty() {
                            println!("Not enough recent data to project");
                            return Ok(());
                        }

                        println!(
                            "{:<24}  {:>8}  {:>9}  {:>8}  {:>10}",
                            "METRIC", "CURRENT", "PREDICTED", "CHANGE", "CONFIDENCE"
                        );
                        println!("{}", "-".repeat(68));
                        let mut rows: Vec<_> = report.predictions.iter().collect();
                        rows.sort_by(|a, b| a.0.cmp(b.0));
                        for (metric, prediction) in rows {
                            println!(
                                "{:<24}  {:>8.1}  {:>9.1}  {:>8.1}  {:>9.0}%",
                                metric,
                                prediction.current_value,
                                prediction.predicted_value,
                                prediction.change,
                                prediction.confidence * 100.0,
                            );
                        }

                        if !report.confidence_note.is_empty() {
                            println!("\nNote: {}", report.confidence_note);
                        }
                    }
                }
                Ok(())
            }

            AnalyticsSubcommand::Goal {
                target_weight,
                target_date,
                format,
            } => {
                if *target_weight <= 0.0 {
                    return Err("Target weight must be a positive number".into());
                }

                let progress = coordinator
                    .api()
                    .get_goal_progress(*target_weight, *target_date)
                    .await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&progress)?);
                    }
                    OutputFormat::Text => {
                        println!("Goal Progress");
                        println!("=============\n");

                        println!("Current weight:  {:.1} kg", progress.current_weight);
                        println!("Target weight:   {:.1} kg", progress.target_weight);
                        println!("To change:       {:+.1} kg", progress.weight_to_change);
                        println!(
                            "Time remaining:  {} day(s) ({:.1} week(s))",
                            progress.days_remaining, progress.weeks_remaining
                        );
                        println!(
                            "Required rate:   {:+.2} kg/week",
                            progress.required_weekly_rate
                        );
                        println!(
                            "Current trend:   {}",
                            progress.current_trend.trend.replace('_', " ")
                        );
                        println!("Feasibility:     {}", progress.feasibility);
                        println!("\n{}", progress.recommendation);
                    }
                }
                Ok(())
            }

            AnalyticsSubcommand::Correlations { format } => {
                let report = coordinator.api().get_correlations().await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                    OutputFormat::Text => {
                        if report.strong_correlations.is_empty() {
                            println!("No strong correlations found");
                            return Ok(());
                        }

                        println!(
                            "{:<24}  {:<24}  {:>6}  {:<10}  DIRECTION",
                            "METRIC 1", "METRIC 2", "R", "STRENGTH"
                        );
                        println!("{}", "-".repeat(84));
                        for c in &report.strong_correlations {
                            println!(
                                "{:<24}  {:<24}  {:>6.2}  {:<10}  {}",
                                c.metric1, c.metric2, c.correlation, c.strength, c.direction
                            );
                        }

                        if !report.insights.is_empty() {
                            println!("\nInsights");
                            for insight in &report.insights {
                                println!("  * {}", insight);
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
