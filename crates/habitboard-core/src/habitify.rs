//! Habitify API client and its caching wrapper.
//!
//! Raw responses are validated against typed structs right at this
//! boundary; a missing field is a `MalformedResponse` here rather than a
//! crash deeper in the walk.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::cache::{CacheStore, ResponseCache};
use crate::error::CoreError;

/// Production API base.
pub const BASE_URL: &str = "https://api.habitify.me";

/// Raw habit record from `GET /habits`.
#[derive(Debug, Clone, Deserialize)]
pub struct HabitRecord {
    pub id: String,
    pub name: String,
    pub start_date: String,
    #[serde(default)]
    pub is_archived: bool,
}

#[derive(Debug, Deserialize)]
struct HabitListEnvelope {
    data: Vec<HabitRecord>,
}

/// Progress sub-object of a day status response.
#[derive(Debug, Clone, Deserialize)]
pub struct DayProgress {
    pub current_value: f64,
    #[serde(default)]
    pub target_value: Option<f64>,
}

/// Payload of `GET /status/{habit_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DayStatusData {
    pub status: String,
    #[serde(default)]
    pub progress: Option<DayProgress>,
}

#[derive(Debug, Deserialize)]
struct DayStatusEnvelope {
    data: DayStatusData,
}

/// The remote habit-tracking service as seen by the aggregation pipeline.
///
/// The history walk only needs per-day statuses; the aggregator also needs
/// the habit list. Tests substitute an in-memory implementation.
pub trait HabitService {
    /// Fetch all habits, archived ones included. Never cached.
    fn list_habits(&self) -> Result<Vec<HabitRecord>, CoreError>;

    /// Fetch one habit's status as of `target`. `use_cache` must be false
    /// for today's lookup since today's status can still change.
    fn day_status(
        &self,
        habit_id: &str,
        target: DateTime<Utc>,
        use_cache: bool,
    ) -> Result<DayStatusData, CoreError>;
}

/// Blocking HTTP client for the Habitify REST API.
///
/// The pipeline is a synchronous batch run with no ambient async runtime,
/// so the client owns a current-thread runtime and blocks on it.
pub struct HabitifyClient {
    http: Client,
    runtime: tokio::runtime::Runtime,
    base_url: Url,
    api_key: String,
}

impl HabitifyClient {
    pub fn new(api_key: &str) -> Result<Self, CoreError> {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Point the client at a different base URL (tests).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, CoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            http: Client::new(),
            runtime,
            base_url: Url::parse(base_url)?,
            api_key: api_key.to_string(),
        })
    }

    /// GET `url`, returning the raw body or a transport error on any
    /// non-success status.
    pub fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, CoreError> {
        log::info!("GET {url}");
        let resp = self.runtime.block_on(
            self.http
                .get(url.clone())
                .header("Authorization", &self.api_key)
                .header("Content-Type", "application/json")
                .send(),
        )?;

        if !resp.status().is_success() {
            return Err(CoreError::Transport {
                endpoint: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body = self.runtime.block_on(resp.bytes())?;
        Ok(body.to_vec())
    }

    /// Fully-qualified day-status request URL; also the cache identity.
    pub fn status_url(&self, habit_id: &str, target: &DateTime<Utc>) -> Result<Url, CoreError> {
        let mut url = self.base_url.join(&format!("status/{habit_id}"))?;
        url.query_pairs_mut()
            .append_pair("target_date", &target.to_rfc3339());
        Ok(url)
    }

    pub fn list_habits(&self) -> Result<Vec<HabitRecord>, CoreError> {
        let url = self.base_url.join("habits")?;
        let body = self.get_bytes(&url)?;
        let envelope: HabitListEnvelope = decode(&body, "habit list")?;
        Ok(envelope.data)
    }
}

fn decode<'a, T: Deserialize<'a>>(body: &'a [u8], context: &str) -> Result<T, CoreError> {
    serde_json::from_slice(body).map_err(|e| CoreError::MalformedResponse {
        context: context.to_string(),
        message: e.to_string(),
    })
}

/// [`HabitifyClient`] with the response cache in front of day-status calls.
///
/// The habit list is always live; per-day statuses for closed days go
/// through the TTL cache.
pub struct CachedHabitify<S: CacheStore> {
    client: HabitifyClient,
    cache: ResponseCache<S>,
}

impl<S: CacheStore> CachedHabitify<S> {
    pub fn new(client: HabitifyClient, cache: ResponseCache<S>) -> Self {
        Self { client, cache }
    }
}

impl<S: CacheStore> HabitService for CachedHabitify<S> {
    fn list_habits(&self) -> Result<Vec<HabitRecord>, CoreError> {
        self.client.list_habits()
    }

    fn day_status(
        &self,
        habit_id: &str,
        target: DateTime<Utc>,
        use_cache: bool,
    ) -> Result<DayStatusData, CoreError> {
        let url = self.client.status_url(habit_id, &target)?;
        let body = self
            .cache
            .fetch(url.as_str(), use_cache, || self.client.get_bytes(&url))?;
        let envelope: DayStatusEnvelope = decode(&body, "day status")?;
        Ok(envelope.data)
    }
}
