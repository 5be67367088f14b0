use clap::Args;

use crate::commands::OutputFormat;
use crate::sync::SyncCoordinator;

/// Show the fitness summary for all recorded data
#[derive(Args)]
pub struct SummaryCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SummaryCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let summary = coordinator.load_summary().await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                if summary.is_empty() {
                    println!("No measurement data available yet");
                    return Ok(());
                }

                println!("Fitness Summary");
                println!("===============\n");

                if let Some(overview) = summary.overview.as_object() {
                    for (key, value) in overview {
                        println!("{}: {}", key.replace('_', " "), render_value(value));
                    }
                    println!();
                }

                if !summary.current_stats.is_empty() {
                    println!(
                        "{:<24}  {:>8}  {:>8}  {:>8}  {:>8}",
                        "METRIC", "CURRENT", "MIN", "MAX", "AVG"
                    );
                    println!("{}", "-".repeat(64));
                    let mut metrics: Vec<_> = summary.current_stats.iter().collect();
                    metrics.sort_by(|a, b| a.0.cmp(b.0));
                    for (metric, stats) in metrics {
                        println!(
                            "{:<24}  {:>8.1}  {:>8.1}  {:>8.1}  {:>8.1}",
                            metric, stats.current, stats.min, stats.max, stats.avg
                        );
                    }
                    println!();
                }

                if !summary.achievements.is_empty() {
                    println!("Achievements");
                    for achievement in &summary.achievements {
                        println!("  * {}", achievement.description);
                    }
                    println!();
                }

                if !summary.health_insights.is_empty() {
                    println!("Insights");
                    for insight in &summary.health_insights {
                        println!("  * {}", insight);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Strips the quotes off JSON strings so overview lines read naturally.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
