mod analytics;
mod config_cmd;
mod export;
mod measurements;
mod photos;
mod prefs;
mod summary;
mod sync_cmd;

pub use analytics::AnalyticsCommand;
pub use config_cmd::ConfigCommand;
pub use export::ExportCommand;
pub use measurements::MeasurementsCommand;
pub use photos::PhotosCommand;
pub use prefs::PrefsCommand;
pub use summary::SummaryCommand;
pub use sync_cmd::{StatusCommand, SyncCommand};

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
