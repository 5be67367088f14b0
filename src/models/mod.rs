mod analytics;
mod measurement;
mod photo;
pub(crate) mod timestamp;

pub use analytics::{
    Achievement, AnalyticsReport, ChangeVelocity, CorrelationReport, ExportResult, GoalProgress,
    MetricAnalysis, MetricStats, Period, Prediction, PredictionReport, ProgressReport,
    StrongCorrelation, Summary, TrendAnalysis, TrendQuery,
};
pub use measurement::{BatchResult, DateRange, Measurement, MeasurementQuery};
pub use photo::{Photo, PhotoQuery};
