//! Authenticated request dispatch against a server instance.
//!
//! Every request targets `{base_url}/api/v3{endpoint}` with the instance's
//! API key in the `X-Api-Key` header. One-shot writes fail fast without a
//! usable instance and report their outcome through the notifier before
//! any error propagates.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::models::{
    AddSeriesOptions, AddSeriesPayload, CommandRequest, CommandResponse, Episode, HealthItem,
    HistoryRecord, Paged, Profile, QueueItem, RootFolder, Series, SeriesLookup, SystemStatus,
};
use crate::instance::Instance;
use crate::notify::Notifier;

const API_PREFIX: &str = "/api/v3";
const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Clone)]
pub struct SonarrClient {
    http: Client,
    notifier: Arc<dyn Notifier>,
}

impl SonarrClient {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        let http = Client::builder()
            .build()
            .expect("Failed to build HTTP client");
        Self { http, notifier }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// `{base_url}/api/v3{endpoint}`; the base URL is already normalized.
    fn endpoint_url(instance: &Instance, endpoint: &str) -> String {
        format!("{}{}{}", instance.base_url, API_PREFIX, endpoint)
    }

    /// Reject an absent or half-configured instance before touching the
    /// network.
    fn usable<'a>(instance: Option<&'a Instance>) -> Result<&'a Instance, ApiError> {
        let instance = instance.ok_or_else(|| ApiError::InvalidInstance {
            reason: "no instance selected".to_string(),
        })?;
        if instance.base_url.is_empty() {
            return Err(ApiError::InvalidInstance {
                reason: format!("instance '{}' has no URL", instance.name),
            });
        }
        if instance.api_key.is_empty() {
            return Err(ApiError::InvalidInstance {
                reason: format!("instance '{}' has no API key", instance.name),
            });
        }
        Ok(instance)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        instance: &Instance,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!(instance = %instance.name, endpoint, "GET");
        let response = self
            .http
            .get(Self::endpoint_url(instance, endpoint))
            .header(API_KEY_HEADER, &instance.api_key)
            .query(query)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        instance: &Instance,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(instance = %instance.name, endpoint, "POST");
        let response = self
            .http
            .post(Self::endpoint_url(instance, endpoint))
            .header(API_KEY_HEADER, &instance.api_key)
            .json(body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete(
        &self,
        instance: &Instance,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<(), ApiError> {
        tracing::debug!(instance = %instance.name, endpoint, "DELETE");
        let response = self
            .http
            .delete(Self::endpoint_url(instance, endpoint))
            .header(API_KEY_HEADER, &instance.api_key)
            .query(query)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // -- Reads ---------------------------------------------------------------

    pub async fn series(&self, instance: &Instance) -> Result<Vec<Series>, ApiError> {
        self.get_json(instance, "/series", &[]).await
    }

    pub async fn queue(&self, instance: &Instance) -> Result<Paged<QueueItem>, ApiError> {
        self.get_json(
            instance,
            "/queue",
            &[
                ("includeSeries", "true".to_string()),
                ("includeEpisode", "true".to_string()),
            ],
        )
        .await
    }

    pub async fn calendar(
        &self,
        instance: &Instance,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Episode>, ApiError> {
        self.get_json(
            instance,
            "/calendar",
            &[
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", end.format("%Y-%m-%d").to_string()),
                ("includeSeries", "true".to_string()),
                ("includeEpisodeFile", "true".to_string()),
                ("includeEpisodeImages", "true".to_string()),
                ("unmonitored", "true".to_string()),
            ],
        )
        .await
    }

    pub async fn missing(&self, instance: &Instance) -> Result<Paged<Episode>, ApiError> {
        self.get_json(
            instance,
            "/wanted/missing",
            &[("includeSeries", "true".to_string())],
        )
        .await
    }

    pub async fn health(&self, instance: &Instance) -> Result<Vec<HealthItem>, ApiError> {
        self.get_json(instance, "/health", &[]).await
    }

    pub async fn system_status(&self, instance: &Instance) -> Result<SystemStatus, ApiError> {
        self.get_json(instance, "/system/status", &[]).await
    }

    pub async fn history(
        &self,
        instance: &Instance,
        series_id: i64,
    ) -> Result<Paged<HistoryRecord>, ApiError> {
        self.get_json(
            instance,
            "/history",
            &[("seriesId", series_id.to_string())],
        )
        .await
    }

    pub async fn root_folders(&self, instance: &Instance) -> Result<Vec<RootFolder>, ApiError> {
        self.get_json(instance, "/rootfolder", &[]).await
    }

    pub async fn quality_profiles(&self, instance: &Instance) -> Result<Vec<Profile>, ApiError> {
        self.get_json(instance, "/qualityprofile", &[]).await
    }

    pub async fn language_profiles(&self, instance: &Instance) -> Result<Vec<Profile>, ApiError> {
        self.get_json(instance, "/languageprofile", &[]).await
    }

    // -- One-shot operations -------------------------------------------------

    /// Free-text series lookup. Degrades to an empty result on any failure
    /// so a transient outage reads as "no results" rather than an error.
    pub async fn search_series(&self, instance: Option<&Instance>, term: &str) -> Vec<SeriesLookup> {
        let result: Result<Vec<SeriesLookup>, ApiError> = async {
            let instance = Self::usable(instance)?;
            self.get_json(instance, "/series/lookup", &[("term", term.to_string())])
                .await
        }
        .await;

        match result {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(term, error = %err, "Series search failed");
                self.notifier.failure(&format!("Search failed: {}", err));
                Vec::new()
            }
        }
    }

    /// Add a series from a lookup result. Fails fast without a usable
    /// instance and propagates any non-success status.
    pub async fn add_series(
        &self,
        instance: Option<&Instance>,
        lookup: &SeriesLookup,
        options: &AddSeriesOptions,
    ) -> Result<Series, ApiError> {
        let instance = Self::usable(instance)?;
        let payload = AddSeriesPayload::build(lookup, options);

        match self.post_json(instance, "/series", &payload).await {
            Ok(series) => {
                self.notifier
                    .success(&format!("Added series '{}'", lookup.title));
                Ok(series)
            }
            Err(err) => {
                self.notifier
                    .failure(&format!("Failed to add '{}': {}", lookup.title, err));
                Err(err)
            }
        }
    }

    /// Remove a queue item, optionally dropping it from the download client
    /// and blocklisting the release (both default to true at call sites).
    pub async fn remove_queue_item(
        &self,
        instance: Option<&Instance>,
        id: i64,
        remove_from_client: bool,
        blocklist: bool,
    ) -> Result<(), ApiError> {
        let instance = Self::usable(instance)?;
        let endpoint = format!("/queue/{}", id);
        let query = [
            ("removeFromClient", remove_from_client.to_string()),
            ("blocklist", blocklist.to_string()),
        ];

        match self.delete(instance, &endpoint, &query).await {
            Ok(()) => {
                self.notifier.success("Removed item from queue");
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .failure(&format!("Failed to remove queue item: {}", err));
                Err(err)
            }
        }
    }

    /// Probe the instance by fetching system status. Never throws; any
    /// failure reads as "not reachable".
    pub async fn test_connection(&self, instance: Option<&Instance>) -> bool {
        let result: Result<SystemStatus, ApiError> = async {
            let instance = Self::usable(instance)?;
            self.system_status(instance).await
        }
        .await;

        match result {
            Ok(status) => {
                self.notifier
                    .success(&format!("Connected (version {})", status.version));
                true
            }
            Err(err) => {
                self.notifier.failure(&format!("Connection failed: {}", err));
                false
            }
        }
    }

    /// Trigger a server-side search for the given episodes.
    pub async fn search_episodes(
        &self,
        instance: Option<&Instance>,
        episode_ids: Vec<i64>,
    ) -> Result<CommandResponse, ApiError> {
        let instance = Self::usable(instance)?;
        let body = CommandRequest::episode_search(episode_ids);

        match self.post_json(instance, "/command", &body).await {
            Ok(command) => {
                self.notifier.success("Episode search started");
                Ok(command)
            }
            Err(err) => {
                self.notifier
                    .failure(&format!("Episode search failed: {}", err));
                Err(err)
            }
        }
    }
}
