use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::measurement::Measurement;
use super::timestamp;

/// A progress photo record as served by the tracking API.
///
/// `file_path` and `thumbnail_path` are server-relative static paths.
/// When the backend can pair the photo with a nearby measurement it
/// includes `closest_measurement` and the day distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub file_path: String,
    pub thumbnail_path: String,
    /// Photo timestamp, `YYYY-MM-DD HH:MM:SS` on the wire
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub tags: Vec<String>,
    pub file_size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(with = "timestamp")]
    pub upload_timestamp: NaiveDateTime,
    pub metadata: Option<serde_json::Value>,
    pub closest_measurement: Option<Measurement>,
    pub days_from_measurement: Option<i64>,
}

/// Filters for the photo listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub limit: Option<u32>,
}

impl PhotoQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query string pairs; tags collapse to one comma-separated value.
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(date) = self.start_date {
            params.push(("start_date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            params.push(("end_date", date.format("%Y-%m-%d").to_string()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }

    /// Stable identity for this query, used as a cache key suffix.
    pub fn cache_key(&self) -> String {
        let params = self.to_params();
        if params.is_empty() {
            return "all".to_string();
        }
        params
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}
