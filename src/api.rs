//! HTTP client for the Trackify tracking API.
//!
//! One typed method per backend endpoint. All methods share the same
//! failure translation: transport problems become `ApiError::Network`,
//! non-success statuses become `ApiError::Status` (or `NotFound`), and
//! undecodable bodies become `ApiError::Decode`. The analytics routes
//! that answer 200 with an `{"error": ...}` body surface that as
//! `ApiError::Backend`.

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::multipart;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{
    AnalyticsReport, BatchResult, CorrelationReport, ExportResult, GoalProgress, Measurement,
    MeasurementQuery, Photo, PhotoQuery, PredictionReport, ProgressReport, Summary, TrendQuery,
};

/// Typed client over the tracking API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Builds a client over a preconfigured `reqwest::Client`, for
    /// callers that set timeouts or proxies themselves.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/body-composition, newest first.
    pub async fn list_measurements(
        &self,
        query: &MeasurementQuery,
    ) -> Result<Vec<Measurement>, ApiError> {
        self.get_json("/api/body-composition", &query.to_params())
            .await
    }

    /// POST /api/upload-excel. The backend accepts `.xlsx`/`.xls` by
    /// filename, parses the sheet, and answers with a batch receipt.
    pub async fn upload_measurements(
        &self,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<BatchResult, ApiError> {
        let part = multipart::Part::bytes(data).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint("/api/upload-excel"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// GET /api/photos, newest first.
    pub async fn list_photos(&self, query: &PhotoQuery) -> Result<Vec<Photo>, ApiError> {
        self.get_json("/api/photos", &query.to_params()).await
    }

    /// POST /api/upload-photo. Date and tags travel as query
    /// parameters; the image goes in the multipart body and must carry
    /// an image content type.
    pub async fn upload_photo(
        &self,
        filename: &str,
        data: Vec<u8>,
        date: Option<NaiveDate>,
        tags: &[String],
    ) -> Result<Photo, ApiError> {
        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(image_mime(filename))
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(date) = date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if !tags.is_empty() {
            params.push(("tags", tags.join(",")));
        }

        let response = self
            .http
            .post(self.endpoint("/api/upload-photo"))
            .query(&params)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// DELETE /api/photos/{id}.
    ///
    /// The backend reports a missing photo as an error status whose
    /// detail reads "Photo not found"; that maps to `ApiError::NotFound`
    /// so callers can treat it as already gone.
    pub async fn delete_photo(&self, id: Uuid) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("/api/photos/{}", id)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match Self::decode::<serde_json::Value>(response).await {
            Ok(_) => Ok(()),
            Err(ApiError::Status { message, .. })
                if message.to_lowercase().contains("not found") =>
            {
                Err(ApiError::NotFound(message))
            }
            Err(e) => Err(e),
        }
    }

    /// GET /api/metrics-summary.
    ///
    /// An empty backend answers this route with an error note instead
    /// of the summary shape; `Summary`'s defaulted fields absorb that,
    /// so the call only fails on real transport or status problems.
    pub async fn get_summary(&self) -> Result<Summary, ApiError> {
        self.get_json("/api/metrics-summary", &[]).await
    }

    /// POST /api/analytics/trends.
    pub async fn get_trend_analysis(
        &self,
        query: &TrendQuery,
    ) -> Result<AnalyticsReport, ApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/analytics/trends"))
            .json(query)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// GET /api/analytics/predictions.
    pub async fn get_predictions(&self, days_ahead: u32) -> Result<PredictionReport, ApiError> {
        let params = [("days_ahead", days_ahead.to_string())];
        self.get_report("/api/analytics/predictions", &params).await
    }

    /// GET /api/analytics/goals.
    pub async fn get_goal_progress(
        &self,
        target_weight: f64,
        target_date: NaiveDate,
    ) -> Result<GoalProgress, ApiError> {
        let params = [
            ("target_weight", target_weight.to_string()),
            ("target_date", target_date.format("%Y-%m-%d").to_string()),
        ];
        self.get_report("/api/analytics/goals", &params).await
    }

    /// GET /api/analytics/correlations.
    pub async fn get_correlations(&self) -> Result<CorrelationReport, ApiError> {
        self.get_report("/api/analytics/correlations", &[]).await
    }

    /// GET /api/export/csv. Returns the download path of the generated
    /// file, not the file itself.
    pub async fn export_csv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<ExportResult, ApiError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(date) = start_date {
            params.push(("start_date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = end_date {
            params.push(("end_date", date.format("%Y-%m-%d").to_string()));
        }
        self.get_json("/api/export/csv", &params).await
    }

    /// GET /api/export/report.
    pub async fn export_report(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        include_photos: bool,
    ) -> Result<ProgressReport, ApiError> {
        let params = [
            ("start_date", start_date.format("%Y-%m-%d").to_string()),
            ("end_date", end_date.format("%Y-%m-%d").to_string()),
            ("include_photos", include_photos.to_string()),
        ];
        self.get_report("/api/export/report", &params).await
    }

    /// GET /health.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health", &[]).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// Like `get_json`, for the routes that report failures in-band
    /// with HTTP 200 and an `{"error": ...}` body.
    async fn get_report<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let value: serde_json::Value = self.get_json(path, params).await?;
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            return Err(ApiError::Backend(error.to_string()));
        }
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = Self::error_detail(response).await;
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(message));
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Extracts the FastAPI-style `{"detail": ...}` message, falling
    /// back to the raw body.
    async fn error_detail(response: reqwest::Response) -> String {
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.detail,
            Err(_) => body,
        }
    }
}

/// Response of the health probe.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: NaiveDateTime,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

fn image_mime(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    match lower.rsplit('.').next() {
        Some("png") => "image/png",
        Some("bmp") => "image/bmp",
        Some("tiff") | Some("tif") => "image/tiff",
        _ => "image/jpeg",
    }
}

/// Errors surfaced by `ApiClient`.
#[derive(Debug)]
pub enum ApiError {
    /// Request never produced a response (DNS, connect, timeout)
    Network(String),
    /// Server answered with a non-success status
    Status { status: u16, message: String },
    /// Server answered 200 but reported a failure in the body
    Backend(String),
    /// Response body did not match the expected shape
    Decode(String),
    /// The addressed resource does not exist on the server
    NotFound(String),
}

impl ApiError {
    /// True when the failure happened below HTTP, meaning the server
    /// could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "Network error: {}", e),
            ApiError::Status { status, message } => {
                write!(f, "Server returned status {}: {}", status, message)
            }
            ApiError::Backend(message) => write!(f, "Server reported: {}", message),
            ApiError::Decode(e) => write!(f, "Failed to decode response: {}", e),
            ApiError::NotFound(resource) => write!(f, "Not found: {}", resource),
        }
    }
}

impl std::error::Error for ApiError {}
