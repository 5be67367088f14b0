//! Serde support for the backend's `YYYY-MM-DD HH:MM:SS` timestamps.
//!
//! The tracking API does not emit ISO-8601 `T` separators, so models
//! annotate their timestamp fields with `#[serde(with = "timestamp")]`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.format(FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super")]
        at: NaiveDateTime,
    }

    #[test]
    fn test_parse_backend_format() {
        let stamped: Stamped = serde_json::from_str(r#"{"at": "2024-03-01 07:45:00"}"#).unwrap();
        assert_eq!(stamped.at.format(FORMAT).to_string(), "2024-03-01 07:45:00");
    }

    #[test]
    fn test_serialize_backend_format() {
        let stamped: Stamped = serde_json::from_str(r#"{"at": "2024-03-01 07:45:00"}"#).unwrap();
        let json = serde_json::to_string(&stamped).unwrap();
        assert_eq!(json, r#"{"at":"2024-03-01 07:45:00"}"#);
    }

    #[test]
    fn test_rejects_iso_t_separator() {
        let result: Result<Stamped, _> = serde_json::from_str(r#"{"at": "2024-03-01T07:45:00"}"#);
        assert!(result.is_err());
    }
}
