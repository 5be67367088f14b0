//! Coordinates multi-domain refreshes between the API, the caches, and the store.
//!
//! The coordinator owns one [`ResponseCache`] per data domain and is the only
//! place that routes API reads through them. Write operations (uploads,
//! deletes) invalidate the affected caches and re-read so the store reflects
//! the write before the call returns.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::api::{ApiClient, ApiError};
use crate::cache::ResponseCache;
use crate::models::{BatchResult, Measurement, MeasurementQuery, Photo, PhotoQuery, Summary};
use crate::preferences::{Preferences, PreferencesPatch, PreferencesStore, StateError};
use crate::store::{Action, AppState, AppStore};

/// How long a cached measurement or photo list stays fresh.
const LIST_TTL: Duration = Duration::from_secs(2 * 60);

/// How long a cached summary stays fresh. Summaries aggregate the whole
/// history, so they change more slowly than the lists.
const SUMMARY_TTL: Duration = Duration::from_secs(10 * 60);

/// Store contents older than this are considered stale by `needs_refresh`.
const REFRESH_THRESHOLD_MINS: i64 = 5;

/// Orchestrates loads and writes across measurements, photos, and the summary.
///
/// One coordinator is built per process. Reads go through per-domain caches;
/// a full refresh bypasses staleness by clearing the caches afterwards so the
/// next on-demand read hits the network again.
pub struct SyncCoordinator {
    api: ApiClient,
    store: Arc<AppStore>,
    preferences: PreferencesStore,
    measurement_cache: ResponseCache<Vec<Measurement>>,
    photo_cache: ResponseCache<Vec<Photo>>,
    summary_cache: ResponseCache<Summary>,
}

impl SyncCoordinator {
    /// Creates a coordinator with empty caches.
    pub fn new(api: ApiClient, store: Arc<AppStore>, preferences: PreferencesStore) -> Self {
        Self {
            api,
            store,
            preferences,
            measurement_cache: ResponseCache::new(),
            photo_cache: ResponseCache::new(),
            summary_cache: ResponseCache::new(),
        }
    }

    /// The store this coordinator dispatches into.
    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    /// The API client used for direct (uncached) calls.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Refreshes all three data domains together.
    ///
    /// The reads run concurrently and fail fast: if any of them errors, the
    /// results of the others are discarded and nothing but the error message
    /// lands in the store. After a successful apply the caches are cleared,
    /// so an explicit refresh is always stronger than the TTL policy.
    pub async fn refresh_all(&self) -> Result<(), ApiError> {
        self.store.dispatch(Action::BeginLoad).await;

        let measurement_query = MeasurementQuery::new();
        let photo_query = PhotoQuery::new();
        let fetched = tokio::try_join!(
            self.cached_measurements(&measurement_query),
            self.cached_photos(&photo_query),
            self.cached_summary(),
        );

        match fetched {
            Ok((measurements, photos, summary)) => {
                tracing::debug!(
                    "Refreshed {} measurement(s) and {} photo(s)",
                    measurements.len(),
                    photos.len()
                );
                self.store.dispatch(Action::SetMeasurements(measurements)).await;
                self.store.dispatch(Action::SetPhotos(photos)).await;
                self.store.dispatch(Action::SetSummary(summary)).await;
                self.store.dispatch(Action::SetOnline(true)).await;

                self.measurement_cache.clear().await;
                self.photo_cache.clear().await;
                self.summary_cache.clear().await;
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Refresh failed: {}", error);
                self.store
                    .dispatch(Action::LoadFailed(error.to_string()))
                    .await;
                if error.is_network() {
                    self.store.dispatch(Action::SetOnline(false)).await;
                }
                Err(error)
            }
        }
    }

    /// True when the store has never synced or the last sync is more than
    /// five minutes old. The coordinator never refreshes on its own; callers
    /// use this to decide when to invoke `refresh_all`.
    pub async fn needs_refresh(&self) -> bool {
        let snapshot = self.store.snapshot().await;
        is_stale(snapshot.last_sync_at, Utc::now())
    }

    /// Runs `refresh_all` only when the store is stale. Returns whether a
    /// refresh actually happened.
    pub async fn refresh_if_stale(&self) -> Result<bool, ApiError> {
        if !self.needs_refresh().await {
            return Ok(false);
        }
        self.refresh_all().await?;
        Ok(true)
    }

    /// Loads measurements through the cache and applies them to the store.
    ///
    /// Errors are recorded in the store and also returned, so call sites can
    /// react on top of the shared error display.
    pub async fn load_measurements(
        &self,
        query: &MeasurementQuery,
    ) -> Result<Vec<Measurement>, ApiError> {
        self.store.dispatch(Action::BeginLoad).await;
        match self.cached_measurements(query).await {
            Ok(measurements) => {
                self.store
                    .dispatch(Action::SetMeasurements(measurements.clone()))
                    .await;
                Ok(measurements)
            }
            Err(error) => {
                self.store
                    .dispatch(Action::LoadFailed(error.to_string()))
                    .await;
                Err(error)
            }
        }
    }

    /// Loads photos through the cache and applies them to the store.
    pub async fn load_photos(&self, query: &PhotoQuery) -> Result<Vec<Photo>, ApiError> {
        self.store.dispatch(Action::BeginLoad).await;
        match self.cached_photos(query).await {
            Ok(photos) => {
                self.store.dispatch(Action::SetPhotos(photos.clone())).await;
                Ok(photos)
            }
            Err(error) => {
                self.store
                    .dispatch(Action::LoadFailed(error.to_string()))
                    .await;
                Err(error)
            }
        }
    }

    /// Loads the summary through the cache and applies it to the store.
    pub async fn load_summary(&self) -> Result<Summary, ApiError> {
        self.store.dispatch(Action::BeginLoad).await;
        match self.cached_summary().await {
            Ok(summary) => {
                self.store
                    .dispatch(Action::SetSummary(summary.clone()))
                    .await;
                Ok(summary)
            }
            Err(error) => {
                self.store
                    .dispatch(Action::LoadFailed(error.to_string()))
                    .await;
                Err(error)
            }
        }
    }

    /// Uploads a measurement batch, then re-reads measurements and the
    /// derived summary so the store reflects the upload before returning.
    pub async fn upload_measurements(
        &self,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<BatchResult, ApiError> {
        let receipt = self.api.upload_measurements(filename, data).await?;
        tracing::info!(
            "Uploaded batch '{}' ({} record(s))",
            filename,
            receipt.records_count.unwrap_or(0)
        );

        self.measurement_cache.clear().await;
        self.summary_cache.clear().await;

        let measurement_query = MeasurementQuery::new();
        let (measurements, summary) = tokio::try_join!(
            self.cached_measurements(&measurement_query),
            self.cached_summary(),
        )?;
        self.store
            .dispatch(Action::SetMeasurements(measurements))
            .await;
        self.store.dispatch(Action::SetSummary(summary)).await;

        Ok(receipt)
    }

    /// Uploads a photo. The new record is prepended immediately so it is
    /// visible at the head of the list, then a fresh read restores server
    /// ordering.
    pub async fn upload_photo(
        &self,
        filename: &str,
        data: Vec<u8>,
        date: Option<NaiveDate>,
        tags: &[String],
    ) -> Result<Photo, ApiError> {
        let photo = self.api.upload_photo(filename, data, date, tags).await?;
        tracing::info!("Uploaded photo '{}' as {}", filename, photo.id);
        self.store
            .dispatch(Action::PrependPhoto(photo.clone()))
            .await;

        self.photo_cache.clear().await;
        let photos = self.cached_photos(&PhotoQuery::new()).await?;
        self.store.dispatch(Action::SetPhotos(photos)).await;

        Ok(photo)
    }

    /// Deletes a photo on the server and removes it from the store.
    ///
    /// Returns `false` when the server no longer had the photo; the local
    /// copy is removed either way, so the outcome is the same for the user.
    pub async fn delete_photo(&self, id: Uuid) -> Result<bool, ApiError> {
        let deleted = match self.api.delete_photo(id).await {
            Ok(()) => true,
            Err(error) if error.is_not_found() => {
                tracing::debug!("Photo {} was already gone on the server", id);
                false
            }
            Err(error) => return Err(error),
        };

        self.store.dispatch(Action::RemovePhoto(id)).await;
        self.photo_cache.clear().await;
        Ok(deleted)
    }

    /// Records a reachability signal supplied by the caller.
    pub async fn set_online(&self, online: bool) {
        self.store.dispatch(Action::SetOnline(online)).await;
    }

    /// Probes the backend health endpoint and records the result.
    pub async fn check_online(&self) -> bool {
        let online = match self.api.health().await {
            Ok(health) => health.is_healthy(),
            Err(error) => {
                tracing::debug!("Health probe failed: {}", error);
                false
            }
        };
        self.set_online(online).await;
        online
    }

    /// Reads persisted preferences and merges them into the store.
    /// Missing or malformed files silently fall back to defaults.
    pub async fn load_preferences(&self) -> Arc<AppState> {
        let stored = self.preferences.load();
        self.store
            .dispatch(Action::MergePreferences(stored.as_patch()))
            .await
    }

    /// Applies a preference change to the store and persists the merged
    /// result, so the full mapping survives process restarts.
    pub async fn merge_preferences(
        &self,
        patch: PreferencesPatch,
    ) -> Result<Preferences, StateError> {
        let state = self.store.dispatch(Action::MergePreferences(patch)).await;
        self.preferences.save(&state.preferences)?;
        Ok(state.preferences.clone())
    }

    async fn cached_measurements(
        &self,
        query: &MeasurementQuery,
    ) -> Result<Vec<Measurement>, ApiError> {
        let key = format!("measurements:{}", query.cache_key());
        self.measurement_cache
            .get(&key, LIST_TTL, || self.api.list_measurements(query))
            .await
    }

    async fn cached_photos(&self, query: &PhotoQuery) -> Result<Vec<Photo>, ApiError> {
        let key = format!("photos:{}", query.cache_key());
        self.photo_cache
            .get(&key, LIST_TTL, || self.api.list_photos(query))
            .await
    }

    async fn cached_summary(&self) -> Result<Summary, ApiError> {
        self.summary_cache
            .get("summary", SUMMARY_TTL, || self.api.get_summary())
            .await
    }
}

/// True when `last_sync_at` is unset or older than the refresh threshold.
fn is_stale(last_sync_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_sync_at {
        Some(last) => now - last > chrono::Duration::minutes(REFRESH_THRESHOLD_MINS),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::preferences::Theme;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn measurement_json(day: u32, weight: f64) -> serde_json::Value {
        json!({
            "date": format!("2024-03-{:02} 08:00:00", day),
            "weight_kg": weight,
            "bmi": 24.2,
            "body_fat_percent": 18.5,
            "fat_free_weight_kg": 63.9,
            "body_water_percent": 55.1,
            "skeletal_muscle_percent": 44.8,
            "muscle_mass_kg": 35.2,
            "bone_mass_kg": 3.1,
            "basal_metabolic_rate": 1650
        })
    }

    fn photo_json(id: &str, day: u32) -> serde_json::Value {
        json!({
            "id": id,
            "filename": format!("2024-03-{:02}_front.jpg", day),
            "original_filename": "front.jpg",
            "file_path": format!("photos/2024-03-{:02}_front.jpg", day),
            "thumbnail_path": format!("thumbnails/2024-03-{:02}_front.jpg", day),
            "date": format!("2024-03-{:02} 09:00:00", day),
            "tags": ["front"],
            "file_size": 52_480,
            "upload_timestamp": format!("2024-03-{:02} 09:05:00", day)
        })
    }

    fn summary_json() -> serde_json::Value {
        json!({
            "overview": {"total_measurements": 12},
            "current_stats": {
                "weight_kg": {"current": 70.4, "min": 69.8, "max": 72.1, "avg": 70.9, "std": 0.6}
            },
            "trends": {},
            "achievements": [],
            "health_insights": ["Weight is trending down"]
        })
    }

    /// Backend where every domain can be switched to failing, and the list
    /// endpoints count their hits.
    struct FakeBackend {
        base_url: String,
        photos_fail: Arc<AtomicBool>,
        measurements_fail: Arc<AtomicBool>,
        measurement_hits: Arc<AtomicUsize>,
        photo_hits: Arc<AtomicUsize>,
    }

    async fn fake_backend() -> FakeBackend {
        let photos_fail = Arc::new(AtomicBool::new(false));
        let measurements_fail = Arc::new(AtomicBool::new(false));
        let measurement_hits = Arc::new(AtomicUsize::new(0));
        let photo_hits = Arc::new(AtomicUsize::new(0));

        let m_fail = measurements_fail.clone();
        let m_hits = measurement_hits.clone();
        let p_fail = photos_fail.clone();
        let p_hits = photo_hits.clone();

        let app = Router::new()
            .route(
                "/api/body-composition",
                get(move || {
                    let fail = m_fail.clone();
                    let hits = m_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        if fail.load(Ordering::SeqCst) {
                            return (
                                StatusCode::INTERNAL_SERVER_ERROR,
                                Json(json!({"detail": "measurement store offline"})),
                            )
                                .into_response();
                        }
                        Json(json!([measurement_json(15, 70.4), measurement_json(14, 70.9)]))
                            .into_response()
                    }
                }),
            )
            .route(
                "/api/photos",
                get(move || {
                    let fail = p_fail.clone();
                    let hits = p_hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        if fail.load(Ordering::SeqCst) {
                            return (
                                StatusCode::INTERNAL_SERVER_ERROR,
                                Json(json!({"detail": "photo store offline"})),
                            )
                                .into_response();
                        }
                        Json(json!([photo_json(
                            "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                            15
                        )]))
                        .into_response()
                    }
                }),
            )
            .route(
                "/api/metrics-summary",
                get(|| async { Json(summary_json()) }),
            );

        FakeBackend {
            base_url: serve(app).await,
            photos_fail,
            measurements_fail,
            measurement_hits,
            photo_hits,
        }
    }

    fn coordinator(base_url: &str, prefs_path: std::path::PathBuf) -> SyncCoordinator {
        SyncCoordinator::new(
            ApiClient::new(base_url),
            Arc::new(AppStore::new()),
            PreferencesStore::new(prefs_path),
        )
    }

    #[tokio::test]
    async fn test_refresh_all_populates_store() {
        let backend = fake_backend().await;
        let dir = tempdir().unwrap();
        let coordinator = coordinator(&backend.base_url, dir.path().join("prefs.json"));

        coordinator.refresh_all().await.unwrap();

        let state = coordinator.store().snapshot().await;
        assert_eq!(state.measurements.len(), 2);
        assert_eq!(state.photos.len(), 1);
        assert!(state.summary.is_some());
        assert!(!state.status.is_loading);
        assert!(state.status.error.is_none());
        assert!(state.last_sync_at.is_some());
        assert!(state.is_online);
    }

    #[tokio::test]
    async fn test_refresh_all_clears_caches_on_success() {
        let backend = fake_backend().await;
        let dir = tempdir().unwrap();
        let coordinator = coordinator(&backend.base_url, dir.path().join("prefs.json"));

        coordinator.refresh_all().await.unwrap();
        assert!(coordinator.measurement_cache.is_empty().await);
        assert!(coordinator.photo_cache.is_empty().await);
        assert!(coordinator.summary_cache.is_empty().await);

        // With the caches cleared, another refresh goes back to the network.
        coordinator.refresh_all().await.unwrap();
        assert_eq!(backend.measurement_hits.load(Ordering::SeqCst), 2);
        assert_eq!(backend.photo_hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_all_discards_partial_results() {
        let backend = fake_backend().await;
        let dir = tempdir().unwrap();
        let coordinator = coordinator(&backend.base_url, dir.path().join("prefs.json"));
        backend.photos_fail.store(true, Ordering::SeqCst);

        let error = coordinator.refresh_all().await.unwrap_err();
        assert!(error.to_string().contains("photo store offline"));

        // Measurements succeeded on the wire but must not land in the store.
        let state = coordinator.store().snapshot().await;
        assert!(state.measurements.is_empty());
        assert!(state.photos.is_empty());
        assert!(state.summary.is_none());
        assert!(!state.status.is_loading);
        assert_eq!(
            state.status.error.as_deref(),
            Some(error.to_string().as_str())
        );
        assert!(state.last_sync_at.is_none());
    }

    #[tokio::test]
    async fn test_refresh_all_marks_offline_on_network_failure() {
        let dir = tempdir().unwrap();
        // Port 9 is the discard service; nothing is listening there.
        let coordinator = coordinator("http://127.0.0.1:9", dir.path().join("prefs.json"));

        let error = coordinator.refresh_all().await.unwrap_err();
        assert!(error.is_network());

        let state = coordinator.store().snapshot().await;
        assert!(!state.is_online);
        assert!(state.status.error.is_some());
    }

    #[tokio::test]
    async fn test_load_measurements_serves_stale_when_backend_dies() {
        let backend = fake_backend().await;
        let dir = tempdir().unwrap();
        let coordinator = coordinator(&backend.base_url, dir.path().join("prefs.json"));
        let query = MeasurementQuery::new().with_limit(10);

        let first = coordinator.load_measurements(&query).await.unwrap();
        assert_eq!(first.len(), 2);

        backend.measurements_fail.store(true, Ordering::SeqCst);
        coordinator.measurement_cache.clear().await;

        // No cached entry left, so the failure propagates.
        let error = coordinator.load_measurements(&query).await.unwrap_err();
        assert!(error.to_string().contains("measurement store offline"));
        let state = coordinator.store().snapshot().await;
        assert!(state.status.error.is_some());

        // Recover once to repopulate the cache, then fail again: the entry
        // now absorbs the failure.
        backend.measurements_fail.store(false, Ordering::SeqCst);
        coordinator.load_measurements(&query).await.unwrap();
        backend.measurements_fail.store(true, Ordering::SeqCst);

        let stale = coordinator.load_measurements(&query).await.unwrap();
        assert_eq!(stale.len(), 2);
    }

    #[tokio::test]
    async fn test_list_reads_within_ttl_hit_cache() {
        let backend = fake_backend().await;
        let dir = tempdir().unwrap();
        let coordinator = coordinator(&backend.base_url, dir.path().join("prefs.json"));
        let query = PhotoQuery::new();

        coordinator.load_photos(&query).await.unwrap();
        coordinator.load_photos(&query).await.unwrap();
        assert_eq!(backend.photo_hits.load(Ordering::SeqCst), 1);

        // A different query string is a different cache key.
        coordinator
            .load_photos(&PhotoQuery::new().with_limit(5))
            .await
            .unwrap();
        assert_eq!(backend.photo_hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_needs_refresh_lifecycle() {
        let backend = fake_backend().await;
        let dir = tempdir().unwrap();
        let coordinator = coordinator(&backend.base_url, dir.path().join("prefs.json"));

        assert!(coordinator.needs_refresh().await);
        coordinator.refresh_all().await.unwrap();
        assert!(!coordinator.needs_refresh().await);

        let refreshed = coordinator.refresh_if_stale().await.unwrap();
        assert!(!refreshed);
    }

    #[test]
    fn test_is_stale_threshold() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        assert!(is_stale(None, now));
        assert!(!is_stale(Some(now - chrono::Duration::seconds(299)), now));
        // Exactly five minutes is still fresh; one second past is not.
        assert!(!is_stale(Some(now - chrono::Duration::seconds(300)), now));
        assert!(is_stale(Some(now - chrono::Duration::seconds(301)), now));
    }

    #[tokio::test]
    async fn test_upload_measurements_rereads_affected_domains() {
        let dir = tempdir().unwrap();
        let list_hits = Arc::new(AtomicUsize::new(0));
        let hits = list_hits.clone();

        let app = Router::new()
            .route(
                "/api/upload-excel",
                post(|| async {
                    Json(json!({
                        "message": "Successfully imported 3 records",
                        "records_count": 3,
                        "filename": "export.xlsx"
                    }))
                }),
            )
            .route(
                "/api/body-composition",
                get(move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        Json(json!([measurement_json(16, 70.1)]))
                    }
                }),
            )
            .route(
                "/api/metrics-summary",
                get(|| async { Json(summary_json()) }),
            );
        let base_url = serve(app).await;
        let coordinator = coordinator(&base_url, dir.path().join("prefs.json"));

        let receipt = coordinator
            .upload_measurements("export.xlsx", b"workbook bytes".to_vec())
            .await
            .unwrap();
        assert_eq!(receipt.records_count, Some(3));

        // The re-read happened and landed in the store.
        assert_eq!(list_hits.load(Ordering::SeqCst), 1);
        let state = coordinator.store().snapshot().await;
        assert_eq!(state.measurements.len(), 1);
        assert!(state.summary.is_some());
        assert!(state.last_sync_at.is_some());
    }

    #[tokio::test]
    async fn test_upload_photo_rereads_photo_list() {
        let dir = tempdir().unwrap();
        let uploaded = photo_json("3fa85f64-5717-4562-b3fc-2c963f66afa6", 16);
        let listing = uploaded.clone();

        let app = Router::new()
            .route(
                "/api/upload-photo",
                post(move |_query: Query<HashMap<String, String>>| {
                    let body = uploaded.clone();
                    async move { Json(body) }
                }),
            )
            .route(
                "/api/photos",
                get(move || {
                    let body = listing.clone();
                    async move {
                        Json(json!([
                            body,
                            photo_json("7c9e6679-7425-40de-944b-e07fc1f90ae7", 15)
                        ]))
                    }
                }),
            );
        let base_url = serve(app).await;
        let coordinator = coordinator(&base_url, dir.path().join("prefs.json"));

        let photo = coordinator
            .upload_photo("front.jpg", b"jpeg bytes".to_vec(), None, &[])
            .await
            .unwrap();
        assert_eq!(photo.filename, "2024-03-16_front.jpg");

        let state = coordinator.store().snapshot().await;
        assert_eq!(state.photos.len(), 2);
        assert_eq!(state.photos[0].id, photo.id);
    }

    #[tokio::test]
    async fn test_delete_photo_removes_from_store() {
        let dir = tempdir().unwrap();
        let id = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

        let app = Router::new()
            .route(
                "/api/photos",
                get(move || async move { Json(json!([photo_json(id, 15)])) }),
            )
            .route(
                "/api/photos/{id}",
                delete(|Path(_): Path<Uuid>| async {
                    Json(json!({"message": "Photo deleted successfully"}))
                }),
            );
        let base_url = serve(app).await;
        let coordinator = coordinator(&base_url, dir.path().join("prefs.json"));

        coordinator.load_photos(&PhotoQuery::new()).await.unwrap();
        let deleted = coordinator
            .delete_photo(id.parse().unwrap())
            .await
            .unwrap();
        assert!(deleted);

        let state = coordinator.store().snapshot().await;
        assert!(state.photos.is_empty());
        assert!(coordinator.photo_cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_photo_missing_on_server_is_local_noop() {
        let dir = tempdir().unwrap();
        let app = Router::new().route(
            "/api/photos/{id}",
            delete(|Path(_): Path<Uuid>| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "Photo not found"})),
                )
            }),
        );
        let base_url = serve(app).await;
        let coordinator = coordinator(&base_url, dir.path().join("prefs.json"));

        let deleted = coordinator
            .delete_photo(Uuid::new_v4())
            .await
            .unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_check_online_reflects_backend_health() {
        let dir = tempdir().unwrap();
        let app = Router::new().route(
            "/health",
            get(|| async {
                Json(json!({"status": "healthy", "timestamp": "2024-03-15T12:00:00"}))
            }),
        );
        let base_url = serve(app).await;
        let coordinator = coordinator(&base_url, dir.path().join("prefs.json"));

        assert!(coordinator.check_online().await);
        assert!(coordinator.store().snapshot().await.is_online);

        let unreachable = SyncCoordinator::new(
            ApiClient::new("http://127.0.0.1:9"),
            Arc::new(AppStore::new()),
            PreferencesStore::new(dir.path().join("other.json")),
        );
        assert!(!unreachable.check_online().await);
        assert!(!unreachable.store().snapshot().await.is_online);
    }

    #[tokio::test]
    async fn test_preferences_survive_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let first = coordinator("http://127.0.0.1:9", path.clone());
        first.load_preferences().await;
        first
            .merge_preferences(PreferencesPatch::new().with_theme(Theme::Dark))
            .await
            .unwrap();

        // A new coordinator over the same path sees the saved preferences.
        let second = coordinator("http://127.0.0.1:9", path);
        let state = second.load_preferences().await;
        assert_eq!(state.preferences.theme, Theme::Dark);
        assert_eq!(state.preferences.default_range_days, 30);
    }

    #[tokio::test]
    async fn test_load_preferences_tolerates_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let coordinator = coordinator("http://127.0.0.1:9", path);
        let state = coordinator.load_preferences().await;
        assert_eq!(state.preferences, Preferences::default());
    }
}
