//! Durable user preferences.
//!
//! Preferences live in a JSON file under the data directory and are
//! folded into the app state at startup. A missing file means
//! defaults; a malformed file is logged and ignored, and gets
//! rewritten whole on the next save.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Color scheme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

/// Unit system used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Metric => write!(f, "metric"),
            Units::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(format!("Invalid unit system: {}", s)),
        }
    }
}

/// User preferences carried in every app state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub units: Units,
    /// Default listing window in days
    pub default_range_days: u32,
    /// Metrics charted on the dashboard
    pub chart_metrics: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            units: Units::Metric,
            default_range_days: 30,
            chart_metrics: vec![
                "weight_kg".to_string(),
                "body_fat_percent".to_string(),
                "muscle_mass_kg".to_string(),
            ],
        }
    }
}

impl Preferences {
    /// Returns these preferences with `patch` applied on top.
    pub fn merged(&self, patch: &PreferencesPatch) -> Self {
        let mut merged = self.clone();
        if let Some(theme) = patch.theme {
            merged.theme = theme;
        }
        if let Some(units) = patch.units {
            merged.units = units;
        }
        if let Some(days) = patch.default_range_days {
            merged.default_range_days = days;
        }
        if let Some(metrics) = &patch.chart_metrics {
            merged.chart_metrics = metrics.clone();
        }
        merged
    }

    /// A patch that carries every current value, for seeding the store
    /// from a loaded file.
    pub fn as_patch(&self) -> PreferencesPatch {
        PreferencesPatch {
            theme: Some(self.theme),
            units: Some(self.units),
            default_range_days: Some(self.default_range_days),
            chart_metrics: Some(self.chart_metrics.clone()),
        }
    }
}

/// Partial preference update; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub units: Option<Units>,
    pub default_range_days: Option<u32>,
    pub chart_metrics: Option<Vec<String>>,
}

impl PreferencesPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_default_range_days(mut self, days: u32) -> Self {
        self.default_range_days = Some(days);
        self
    }

    pub fn with_chart_metrics(mut self, metrics: Vec<String>) -> Self {
        self.chart_metrics = Some(metrics);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.units.is_none()
            && self.default_range_days.is_none()
            && self.chart_metrics.is_none()
    }
}

/// Reads and writes the preferences file.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads preferences from disk, falling back to defaults when the
    /// file is missing or unreadable. Corruption is logged, not fatal.
    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            return Preferences::default();
        }
        match self.try_load() {
            Ok(preferences) => preferences,
            Err(e) => {
                tracing::warn!(
                    "Ignoring preferences file '{}': {}",
                    self.path.display(),
                    e
                );
                Preferences::default()
            }
        }
    }

    /// Writes the full preference set, creating parent directories as
    /// needed.
    pub fn save(&self, preferences: &Preferences) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StateError::WriteError(self.path.clone(), e))?;
        }
        let contents = serde_json::to_string_pretty(preferences)
            .map_err(|e| StateError::FormatError(self.path.clone(), e))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| StateError::WriteError(self.path.clone(), e))
    }

    fn try_load(&self) -> Result<Preferences, StateError> {
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| StateError::ReadError(self.path.clone(), e))?;
        serde_json::from_str(&contents)
            .map_err(|e| StateError::FormatError(self.path.clone(), e))
    }
}

/// Errors from the preferences file.
#[derive(Debug)]
pub enum StateError {
    ReadError(PathBuf, std::io::Error),
    WriteError(PathBuf, std::io::Error),
    FormatError(PathBuf, serde_json::Error),
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::ReadError(path, e) => {
                write!(f, "Failed to read preferences file '{}': {}", path.display(), e)
            }
            StateError::WriteError(path, e) => {
                write!(f, "Failed to write preferences file '{}': {}", path.display(), e)
            }
            StateError::FormatError(path, e) => {
                write!(f, "Malformed preferences file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StateError {}
