//! Wire types for the v3 REST API.
//!
//! Deserialization is tolerant: anything the server may omit defaults, so
//! older servers and sparse payloads never fail a whole listing.

use serde::{Deserialize, Serialize};

/// Paged listing wrapper used by queue, history, and missing endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct Paged<T> {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub records: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub cover_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_number: i32,
    #[serde(default)]
    pub monitored: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    #[serde(default)]
    pub episode_file_count: i64,
    #[serde(default)]
    pub episode_count: i64,
    #[serde(default)]
    pub size_on_disk: f64,
    #[serde(default)]
    pub percent_of_episodes: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub monitored: bool,
    #[serde(default)]
    pub title_slug: String,
    #[serde(default)]
    pub tvdb_id: i64,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub statistics: Option<SeriesStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: i64,
    #[serde(default)]
    pub series_id: i64,
    #[serde(default)]
    pub season_number: i32,
    #[serde(default)]
    pub episode_number: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub air_date_utc: Option<String>,
    #[serde(default)]
    pub has_file: bool,
    #[serde(default)]
    pub monitored: bool,
    /// Present on calendar and missing listings when series inclusion is
    /// requested.
    #[serde(default)]
    pub series: Option<Series>,
}

/// One in-flight download. Appears when the server admits a grab and
/// disappears when the server completes, fails, or removes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: i64,
    #[serde(default)]
    pub series_id: Option<i64>,
    #[serde(default)]
    pub episode_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub sizeleft: f64,
    #[serde(default)]
    pub status: String,
    /// Textual `HH:MM:SS` remaining-time field.
    #[serde(default)]
    pub timeleft: Option<String>,
    #[serde(default)]
    pub estimated_completion_time: Option<String>,
    #[serde(default)]
    pub download_id: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub series: Option<Series>,
    #[serde(default)]
    pub episode: Option<Episode>,
}

impl QueueItem {
    /// Whether this item is in active transfer.
    pub fn is_downloading(&self) -> bool {
        self.status.eq_ignore_ascii_case("downloading")
    }

    /// Completion percentage, two decimals, 0 for a zero-size grab.
    pub fn progress(&self) -> f64 {
        crate::format::progress(self.size, self.sizeleft)
    }
}

/// Whether any item in a queue page is still transferring.
pub fn has_active_download(queue: &Paged<QueueItem>) -> bool {
    queue.records.iter().any(QueueItem::is_downloading)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: i64,
    #[serde(default)]
    pub source_title: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub series_id: i64,
    #[serde(default)]
    pub episode_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthItem {
    #[serde(default)]
    pub source: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub wiki_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub instance_name: Option<String>,
    #[serde(default)]
    pub os_name: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootFolder {
    pub id: i64,
    pub path: String,
    #[serde(default)]
    pub free_space: Option<u64>,
    #[serde(default)]
    pub accessible: bool,
}

/// Quality or language profile; both carry the same shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub name: String,
}

/// A candidate returned by the free-text series lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesLookup {
    pub title: String,
    #[serde(default)]
    pub title_slug: String,
    #[serde(default)]
    pub tvdb_id: i64,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub remote_poster: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

/// Caller-supplied knobs for adding a series.
#[derive(Debug, Clone)]
pub struct AddSeriesOptions {
    pub root_folder: String,
    pub quality_profile_id: i64,
    pub language_profile_id: i64,
    /// "standard", "daily", or "anime".
    pub series_type: String,
    pub season_folder: bool,
    pub monitored: bool,
    pub search_on_add: bool,
}

impl Default for AddSeriesOptions {
    fn default() -> Self {
        Self {
            root_folder: String::new(),
            quality_profile_id: 1,
            language_profile_id: 1,
            series_type: "standard".to_string(),
            season_folder: true,
            monitored: true,
            search_on_add: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOptions {
    pub search_for_missing_episodes: bool,
}

/// Body posted to create a series: lookup data plus caller options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSeriesPayload {
    pub title: String,
    pub title_slug: String,
    pub tvdb_id: i64,
    pub images: Vec<Image>,
    pub seasons: Vec<Season>,
    pub root_folder_path: String,
    pub path: String,
    pub quality_profile_id: i64,
    pub language_profile_id: i64,
    pub series_type: String,
    pub season_folder: bool,
    pub monitored: bool,
    pub add_options: AddOptions,
}

impl AddSeriesPayload {
    /// Assemble the payload: title, slug, images, and seasons come from the
    /// lookup result; everything else from caller input. The on-disk path
    /// is the root folder joined with the title.
    pub fn build(lookup: &SeriesLookup, options: &AddSeriesOptions) -> Self {
        Self {
            title: lookup.title.clone(),
            title_slug: lookup.title_slug.clone(),
            tvdb_id: lookup.tvdb_id,
            images: lookup.images.clone(),
            seasons: lookup.seasons.clone(),
            root_folder_path: options.root_folder.clone(),
            path: format!("{}/{}", options.root_folder, lookup.title),
            quality_profile_id: options.quality_profile_id,
            language_profile_id: options.language_profile_id,
            series_type: options.series_type.clone(),
            season_folder: options.season_folder,
            monitored: options.monitored,
            add_options: AddOptions {
                search_for_missing_episodes: options.search_on_add,
            },
        }
    }
}

/// Body posted to trigger a server-side command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub episode_ids: Vec<i64>,
}

impl CommandRequest {
    pub fn episode_search(episode_ids: Vec<i64>) -> Self {
        Self {
            name: "EpisodeSearch".to_string(),
            episode_ids,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
}
