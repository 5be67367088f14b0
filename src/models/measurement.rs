use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// A single body composition measurement as served by the tracking API.
///
/// Scale readings arrive with the core metrics always present; the
/// remaining fields depend on what the scale reported and which derived
/// metrics the backend computed during import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Measurement timestamp, `YYYY-MM-DD HH:MM:SS` on the wire
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    pub weight_kg: f64,
    pub bmi: f64,
    pub body_fat_percent: f64,
    pub fat_free_weight_kg: f64,
    pub subcutaneous_fat_percent: Option<f64>,
    pub visceral_fat: Option<i32>,
    pub body_water_percent: f64,
    pub skeletal_muscle_percent: f64,
    pub muscle_mass_kg: f64,
    pub bone_mass_kg: f64,
    pub protein_percent: Option<f64>,
    pub basal_metabolic_rate: i32,
    pub metabolic_age: Option<i32>,
    pub notes: Option<String>,
    pub muscle_to_weight_ratio: Option<f64>,
    pub fat_muscle_ratio: Option<f64>,
    pub bmi_category: Option<String>,
    pub fitness_score: Option<f64>,
}

/// Filters for the measurement listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl MeasurementQuery {
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

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query string pairs, in the order the backend documents them.
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(date) = self.start_date {
            params.push(("start_date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            params.push(("end_date", date.format("%Y-%m-%d").to_string()));
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

/// Receipt for a measurement batch upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub message: String,
    pub records_count: Option<u64>,
    pub date_range: Option<DateRange>,
    pub filename: Option<String>,
}

/// Inclusive date span covered by an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_measurement_parses_full_record() {
        let json = r#"{
            "date": "2024-03-01 07:45:00",
            "weight_kg": 82.4,
            "bmi": 24.9,
            "body_fat_percent": 18.2,
            "fat_free_weight_kg": 67.4,
            "subcutaneous_fat_percent": 15.1,
            "visceral_fat": 7,
            "body_water_percent": 58.3,
            "skeletal_muscle_percent": 44.6,
            "muscle_mass_kg": 36.7,
            "bone_mass_kg": 3.4,
            "protein_percent": 17.9,
            "basal_metabolic_rate": 1798,
            "metabolic_age": 31,
            "notes": null,
            "muscle_to_weight_ratio": 0.445,
            "fat_muscle_ratio": 0.409,
            "bmi_category": "normal",
            "fitness_score": 71.3
        }"#;

        let measurement: Measurement = serde_json::from_str(json).unwrap();
        assert_eq!(measurement.weight_kg, 82.4);
        assert_eq!(measurement.visceral_fat, Some(7));
        assert_eq!(measurement.bmi_category.as_deref(), Some("normal"));
        assert_eq!(
            measurement.date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(7, 45, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_measurement_tolerates_missing_optional_fields() {
        let json = r#"{
            "date": "2024-03-01 07:45:00",
            "weight_kg": 82.4,
            "bmi": 24.9,
            "body_fat_percent": 18.2,
            "fat_free_weight_kg": 67.4,
            "body_water_percent": 58.3,
            "skeletal_muscle_percent": 44.6,
            "muscle_mass_kg": 36.7,
            "bone_mass_kg": 3.4,
            "basal_metabolic_rate": 1798
        }"#;

        let measurement: Measurement = serde_json::from_str(json).unwrap();
        assert_eq!(measurement.metabolic_age, None);
        assert_eq!(measurement.fitness_score, None);
    }

    #[test]
    fn test_query_params_in_documented_order() {
        let query = MeasurementQuery::new()
            .with_start_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .with_end_date(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
            .with_limit(50);

        assert_eq!(
            query.to_params(),
            vec![
                ("start_date", "2024-01-01".to_string()),
                ("end_date", "2024-03-31".to_string()),
                ("limit", "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_cache_key_distinguishes_queries() {
        let all = MeasurementQuery::new();
        let limited = MeasurementQuery::new().with_limit(10);

        assert_eq!(all.cache_key(), "all");
        assert_eq!(limited.cache_key(), "limit=10");
        assert_ne!(all.cache_key(), limited.cache_key());
    }
}
