//! Tracked reads and the freshness timer that drives them.

mod poller;
mod tracked;

pub use poller::{Poller, POLL_INTERVAL};
pub use tracked::{FetchFuture, Snapshot, TrackedQuery};

use chrono::NaiveDate;

use crate::api::models::{
    has_active_download, Episode, HealthItem, Paged, QueueItem, Series,
};
use crate::api::SonarrClient;
use crate::instance::SelectionState;

/// Tracked read over the full series library.
pub fn series_query(client: &SonarrClient, selection: &SelectionState) -> TrackedQuery<Vec<Series>> {
    TrackedQuery::new(
        client.clone(),
        selection.clone(),
        "series",
        |client, instance| Box::pin(async move { client.series(&instance).await }),
    )
}

/// Tracked read over the download queue.
pub fn queue_query(
    client: &SonarrClient,
    selection: &SelectionState,
) -> TrackedQuery<Paged<QueueItem>> {
    TrackedQuery::new(
        client.clone(),
        selection.clone(),
        "queue",
        |client, instance| Box::pin(async move { client.queue(&instance).await }),
    )
}

/// Poller for the download queue, active while any item is transferring.
pub fn queue_poller(query: TrackedQuery<Paged<QueueItem>>) -> Poller<Paged<QueueItem>> {
    Poller::new(query, has_active_download)
}

/// Tracked read over the airing calendar for a date range.
pub fn calendar_query(
    client: &SonarrClient,
    selection: &SelectionState,
    start: NaiveDate,
    end: NaiveDate,
) -> TrackedQuery<Vec<Episode>> {
    TrackedQuery::new(
        client.clone(),
        selection.clone(),
        format!("calendar {}..{}", start, end),
        move |client, instance| {
            Box::pin(async move { client.calendar(&instance, start, end).await })
        },
    )
}

/// Tracked read over wanted-but-missing episodes.
pub fn missing_query(
    client: &SonarrClient,
    selection: &SelectionState,
) -> TrackedQuery<Paged<Episode>> {
    TrackedQuery::new(
        client.clone(),
        selection.clone(),
        "missing",
        |client, instance| Box::pin(async move { client.missing(&instance).await }),
    )
}

/// Tracked read over server health checks.
pub fn health_query(
    client: &SonarrClient,
    selection: &SelectionState,
) -> TrackedQuery<Vec<HealthItem>> {
    TrackedQuery::new(
        client.clone(),
        selection.clone(),
        "health",
        |client, instance| Box::pin(async move { client.health(&instance).await }),
    )
}
