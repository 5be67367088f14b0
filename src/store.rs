//! Application state and its reducer.
//!
//! `AppState` is an immutable snapshot. The only way to produce a new
//! one is `reduce`, which handles the closed action set exhaustively.
//! `AppStore` keeps the current snapshot behind a lock and swaps it on
//! dispatch, so readers hold cheap `Arc` clones that never change
//! underneath them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Measurement, Photo, Summary};
use crate::preferences::{Preferences, PreferencesPatch};

/// Loading and failure flags for whoever renders the state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub is_loading: bool,
    pub error: Option<String>,
}

/// One immutable snapshot of everything the client knows.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Measurements, newest first as served by the backend
    pub measurements: Vec<Measurement>,
    /// Photos, newest first as served by the backend
    pub photos: Vec<Photo>,
    pub summary: Option<Summary>,
    pub preferences: Preferences,
    pub status: Status,
    /// When synced data last reached this client
    pub last_sync_at: Option<DateTime<Utc>>,
    pub is_online: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            measurements: Vec::new(),
            photos: Vec::new(),
            summary: None,
            preferences: Preferences::default(),
            status: Status::default(),
            last_sync_at: None,
            is_online: true,
        }
    }
}

/// The closed set of state transitions.
#[derive(Debug, Clone)]
pub enum Action {
    /// A refresh started
    BeginLoad,
    /// A refresh failed; the message lands in `status.error`
    LoadFailed(String),
    /// Replace the measurement list with a fresh read
    SetMeasurements(Vec<Measurement>),
    /// Put a just-created measurement at the head of the list
    PrependMeasurement(Measurement),
    /// Replace the photo list with a fresh read
    SetPhotos(Vec<Photo>),
    /// Put a just-uploaded photo at the head of the list
    PrependPhoto(Photo),
    /// Drop one photo by id; unknown ids are a no-op
    RemovePhoto(Uuid),
    SetSummary(Summary),
    /// Fold a preference patch into the snapshot
    MergePreferences(PreferencesPatch),
    SetOnline(bool),
}

/// Produces the successor state for `action`.
///
/// Pure: the caller supplies `now`, so a given (state, action, now)
/// always yields the same snapshot. Actions that land synced list data
/// count as completed loads: they clear the loading flags and stamp
/// `last_sync_at`. Prepends insert at the head as-is, without
/// re-sorting; the next full read restores server order.
pub fn reduce(state: &AppState, action: Action, now: DateTime<Utc>) -> AppState {
    let mut next = state.clone();
    match action {
        Action::BeginLoad => {
            next.status.is_loading = true;
            next.status.error = None;
        }
        Action::LoadFailed(message) => {
            next.status.is_loading = false;
            next.status.error = Some(message);
        }
        Action::SetMeasurements(measurements) => {
            next.measurements = measurements;
            next.status.is_loading = false;
            next.status.error = None;
            next.last_sync_at = Some(now);
        }
        Action::PrependMeasurement(measurement) => {
            next.measurements.insert(0, measurement);
            next.status.is_loading = false;
            next.status.error = None;
            next.last_sync_at = Some(now);
        }
        Action::SetPhotos(photos) => {
            next.photos = photos;
            next.status.is_loading = false;
            next.status.error = None;
            next.last_sync_at = Some(now);
        }
        Action::PrependPhoto(photo) => {
            next.photos.insert(0, photo);
            next.status.is_loading = false;
            next.status.error = None;
            next.last_sync_at = Some(now);
        }
        Action::RemovePhoto(id) => {
            next.photos.retain(|photo| photo.id != id);
        }
        Action::SetSummary(summary) => {
            next.summary = Some(summary);
        }
        Action::MergePreferences(patch) => {
            next.preferences = next.preferences.merged(&patch);
        }
        Action::SetOnline(online) => {
            next.is_online = online;
        }
    }
    next
}

/// Shared holder of the current snapshot.
#[derive(Debug, Default)]
pub struct AppStore {
    state: RwLock<Arc<AppState>>,
}

impl AppStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Arc::new(AppState::default())),
        }
    }

    /// The current snapshot. The returned `Arc` stays valid across
    /// later dispatches; it just stops being current.
    pub async fn snapshot(&self) -> Arc<AppState> {
        self.state.read().await.clone()
    }

    /// Applies `action` and returns the new snapshot.
    pub async fn dispatch(&self, action: Action) -> Arc<AppState> {
        let mut guard = self.state.write().await;
        let next = Arc::new(reduce(&guard, action, Utc::now()));
        *guard = next.clone();
        next
    }
}
