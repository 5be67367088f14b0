//! Trackify Client Library
//!
//! Data-sync core for the Trackify fitness tracker: a typed API client, a
//! TTL-bounded response cache with stale fallback, a reducer-driven
//! application store, and the coordinator that ties them together.

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod models;
pub mod preferences;
pub mod store;
pub mod sync;

pub use api::{ApiClient, ApiError, HealthStatus};
pub use cache::ResponseCache;
pub use config::{Config, ConfigError};
pub use models::{
    Achievement, AnalyticsReport, BatchResult, CorrelationReport, ExportResult, GoalProgress,
    Measurement, MeasurementQuery, MetricStats, Photo, PhotoQuery, PredictionReport,
    ProgressReport, Summary, TrendAnalysis, TrendQuery,
};
pub use preferences::{Preferences, PreferencesPatch, PreferencesStore, StateError, Theme, Units};
pub use store::{Action, AppState, AppStore, Status};
pub use sync::SyncCoordinator;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
