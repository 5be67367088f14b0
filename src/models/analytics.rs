//! Analytics payloads produced by the tracking API.
//!
//! The backend assembles these from whatever data it has on hand, so the
//! listing-style maps default to empty and per-metric rows tolerate the
//! `insufficient_data` shape that replaces real numbers on thin history.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::photo::Photo;

/// Dashboard summary snapshot.
///
/// Treated as an opaque-ish pass-through: the nested overview and trend
/// structures stay as raw JSON, only the pieces the CLI renders get
/// typed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub overview: Value,
    #[serde(default)]
    pub current_stats: HashMap<String, MetricStats>,
    #[serde(default)]
    pub trends: Value,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub health_insights: Vec<String>,
}

impl Summary {
    /// True when the backend had nothing to summarize.
    pub fn is_empty(&self) -> bool {
        self.current_stats.is_empty() && self.overview.as_object().map_or(true, |o| o.is_empty())
    }
}

/// Aggregate statistics for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub current: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub std: f64,
}

/// A milestone the backend spotted in the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub value: f64,
    pub category: String,
}

/// Direction and magnitude of a metric over a period.
///
/// When the period holds fewer than two readings the backend sends only
/// `{"trend": "insufficient_data"}`, hence the optional numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: String,
    pub slope: Option<f64>,
    pub change: Option<f64>,
    pub percent_change: Option<f64>,
    pub data_points: Option<u32>,
    pub period_days: Option<u32>,
}

impl TrendAnalysis {
    pub fn is_insufficient(&self) -> bool {
        self.trend == "insufficient_data"
    }
}

/// Request body for the trend analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub metrics: Vec<String>,
}

impl TrendQuery {
    /// Analysis over the backend's default metric trio.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            metrics: vec![
                "weight_kg".to_string(),
                "body_fat_percent".to_string(),
                "muscle_mass_kg".to_string(),
            ],
        }
    }

    pub fn with_metrics(mut self, metrics: Vec<String>) -> Self {
        self.metrics = metrics;
        self
    }
}

/// Response of the trend analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub period: Period,
    #[serde(default)]
    pub metrics_analysis: HashMap<String, MetricAnalysis>,
    #[serde(default)]
    pub correlations: HashMap<String, f64>,
    #[serde(default)]
    pub change_velocity: HashMap<String, ChangeVelocity>,
    #[serde(default)]
    pub predictions: HashMap<String, Prediction>,
}

/// The analyzed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub start: String,
    pub end: String,
    pub duration_days: i64,
    pub data_points: u64,
}

/// Per-metric statistics and regression results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAnalysis {
    pub current: f64,
    pub start: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub total_change: f64,
    pub total_change_percent: f64,
    pub trend_slope: f64,
    pub r_squared: f64,
    pub volatility: f64,
    pub largest_daily_change: f64,
}

/// Rate-of-change figures; absent on metrics with under three readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeVelocity {
    pub avg_daily_change: Option<f64>,
    pub max_daily_change: Option<f64>,
    pub min_daily_change: Option<f64>,
    pub acceleration: Option<f64>,
}

/// Linear projection for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub current_value: f64,
    pub predicted_value: f64,
    pub change: f64,
    pub confidence: f64,
    pub trend: String,
}

/// Response of the predictions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub prediction_period: u32,
    pub base_data_points: u64,
    #[serde(default)]
    pub predictions: HashMap<String, Prediction>,
    #[serde(default)]
    pub confidence_note: String,
}

/// Assessment of a weight target against the current trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub current_weight: f64,
    pub target_weight: f64,
    pub weight_to_change: f64,
    pub days_remaining: i64,
    pub weeks_remaining: f64,
    pub required_weekly_rate: f64,
    pub current_trend: TrendAnalysis,
    pub feasibility: String,
    pub recommendation: String,
}

/// Response of the correlations endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    #[serde(default)]
    pub correlation_matrix: Value,
    #[serde(default)]
    pub strong_correlations: Vec<StrongCorrelation>,
    #[serde(default)]
    pub insights: Vec<String>,
}

/// A metric pair the backend flagged as strongly correlated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongCorrelation {
    pub metric1: String,
    pub metric2: String,
    pub correlation: f64,
    pub strength: String,
    pub direction: String,
}

/// Full progress report for a period, photos included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    #[serde(default)]
    pub report_info: Value,
    #[serde(default)]
    pub summary: Value,
    #[serde(default)]
    pub key_changes: Value,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub trends: Value,
    #[serde(default)]
    pub health_insights: Vec<String>,
    #[serde(default)]
    pub photos_timeline: Vec<Photo>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Location of a server-side CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    pub download_url: String,
}
