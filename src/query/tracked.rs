//! Live, refreshable reads with stale-result suppression.
//!
//! A [`TrackedQuery`] owns the last snapshot for one (instance, endpoint)
//! pair. Every refresh resolves the selected instance at start time and
//! captures a request generation; an outcome is applied only while its
//! generation is still current, so a slow earlier request can never
//! overwrite the result of a newer one regardless of completion order.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::{ApiError, SonarrClient};
use crate::instance::{Instance, SelectionState};

/// Boxed in-flight fetch for one endpoint.
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send>>;

/// The last known result of a tracked read.
///
/// `data` is replaced wholesale on success and retained on failure, so a
/// stale-but-shown listing survives a flaky refresh.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub data: Option<Arc<T>>,
    pub error: Option<Arc<ApiError>>,
    pub is_loading: bool,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
        }
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }
}

/// A live query against one endpoint of the selected instance.
pub struct TrackedQuery<T> {
    inner: Arc<QueryInner<T>>,
}

impl<T> Clone for TrackedQuery<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct QueryInner<T> {
    client: SonarrClient,
    selection: SelectionState,
    /// Endpoint signature, used for logs and notifications.
    key: String,
    generation: AtomicU64,
    /// Generation of the most recently started fetch; owns `is_loading`.
    last_started: AtomicU64,
    state: Mutex<Snapshot<T>>,
    fetch: Box<dyn Fn(SonarrClient, Instance) -> FetchFuture<T> + Send + Sync>,
}

impl<T: Send + Sync + 'static> TrackedQuery<T> {
    pub fn new<F>(
        client: SonarrClient,
        selection: SelectionState,
        key: impl Into<String>,
        fetch: F,
    ) -> Self
    where
        F: Fn(SonarrClient, Instance) -> FetchFuture<T> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(QueryInner {
                client,
                selection,
                key: key.into(),
                generation: AtomicU64::new(0),
                last_started: AtomicU64::new(0),
                state: Mutex::new(Snapshot::default()),
                fetch: Box::new(fetch),
            }),
        }
    }

    /// Current snapshot, cheap to clone.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.inner.state.lock().clone()
    }

    /// Cancel interest in any in-flight request without starting a new one.
    ///
    /// The abandoned request still runs to completion but its outcome is
    /// discarded. Used when the selection or derived parameters change and
    /// no immediate refetch is wanted.
    pub fn invalidate(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Issue the request once and apply the outcome unless superseded.
    ///
    /// Suppressed entirely (no network call, not loading) when the
    /// selected instance is missing credentials.
    pub async fn refresh(&self) {
        let inner = &self.inner;
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let instance = inner.selection.current();
        if !instance.is_usable() {
            inner.state.lock().is_loading = false;
            return;
        }

        inner.last_started.store(generation, Ordering::SeqCst);
        inner.state.lock().is_loading = true;
        let result = (inner.fetch)(inner.client.clone(), instance.clone()).await;

        let mut state = inner.state.lock();
        if inner.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                key = %inner.key,
                instance = %instance.name,
                generation,
                "Discarding superseded result"
            );
            // A bare invalidate must not leave the loading flag stuck, but a
            // newer fetch that is still in flight owns it.
            if inner.last_started.load(Ordering::SeqCst) == generation {
                state.is_loading = false;
            }
            return;
        }

        state.is_loading = false;
        match result {
            Ok(data) => {
                state.data = Some(Arc::new(data));
                state.error = None;
            }
            Err(err) => {
                tracing::warn!(key = %inner.key, instance = %instance.name, error = %err, "Refresh failed");
                inner
                    .client
                    .notifier()
                    .failure(&format!("Failed to load {}: {}", inner.key, err));
                state.error = Some(Arc::new(err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActiveSelector, Config, PrimaryInstance, SecondaryInstance};
    use crate::instance::InstanceRegistry;
    use crate::notify::RecordingNotifier;
    use std::time::Duration;

    fn selection() -> SelectionState {
        let config = Config {
            active: ActiveSelector::Primary,
            primary: PrimaryInstance {
                name: "Main".to_string(),
                url: "http://main.invalid".to_string(),
                api_key: "abc".to_string(),
            },
            secondary: Some(SecondaryInstance {
                name: "4K".to_string(),
                url: "http://uhd.invalid".to_string(),
                api_key: "def".to_string(),
                enabled: true,
            }),
        };
        SelectionState::new(InstanceRegistry::from_config(&config).unwrap())
    }

    fn client() -> (SonarrClient, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (SonarrClient::new(notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn success_replaces_snapshot_wholesale() {
        let (client, _) = client();
        let query = TrackedQuery::new(client, selection(), "names", |_, instance| {
            Box::pin(async move { Ok(vec![instance.name]) }) as FetchFuture<Vec<String>>
        });

        query.refresh().await;
        let snap = query.snapshot();
        assert_eq!(snap.data.as_deref(), Some(&vec!["Main".to_string()]));
        assert!(snap.error.is_none());
        assert!(!snap.is_loading);
    }

    #[tokio::test]
    async fn failure_retains_previous_data_and_notifies_once() {
        let (client, notifier) = client();
        let attempts = Arc::new(AtomicU64::new(0));
        let counter = attempts.clone();
        let query = TrackedQuery::new(client, selection(), "flaky", move |_, _| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if n == 0 {
                    Ok(7u64)
                } else {
                    Err(ApiError::Status {
                        status: 500,
                        body: "boom".to_string(),
                    })
                }
            }) as FetchFuture<u64>
        });

        query.refresh().await;
        query.refresh().await;

        let snap = query.snapshot();
        assert_eq!(snap.data.as_deref(), Some(&7));
        assert!(snap.error.is_some());
        assert_eq!(notifier.failure_count(), 1);
    }

    #[tokio::test]
    async fn slow_old_request_cannot_overwrite_newer_result() {
        let (client, _) = client();
        let sel = selection();
        let query = TrackedQuery::new(client, sel.clone(), "who", |_, instance| {
            Box::pin(async move {
                if instance.name == "Main" {
                    // The first instance answers late.
                    tokio::time::sleep(Duration::from_millis(80)).await;
                }
                Ok(instance.name)
            }) as FetchFuture<String>
        });

        let pending = {
            let query = query.clone();
            tokio::spawn(async move { query.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        sel.switch("4K").unwrap();
        query.refresh().await;
        assert_eq!(query.snapshot().data.as_deref(), Some(&"4K".to_string()));

        // Let the stale request complete; it must be discarded.
        pending.await.unwrap();
        assert_eq!(query.snapshot().data.as_deref(), Some(&"4K".to_string()));
    }

    #[tokio::test]
    async fn invalidate_discards_in_flight_result() {
        let (client, _) = client();
        let query = TrackedQuery::new(client, selection(), "slow", |_, _| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                Ok(1u32)
            }) as FetchFuture<u32>
        });

        let pending = {
            let query = query.clone();
            tokio::spawn(async move { query.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        query.invalidate();
        pending.await.unwrap();

        let snap = query.snapshot();
        assert!(snap.data.is_none());
        // Nothing is outstanding, so the snapshot must not claim to load.
        assert!(!snap.is_loading);
    }

    #[tokio::test]
    async fn superseded_completion_leaves_newer_loading_flag_alone() {
        let (client, _) = client();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();
        let query = TrackedQuery::new(client, selection(), "pair", move |_, _| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                // The first request finishes well before the second.
                let wait = if n == 0 { 30 } else { 200 };
                tokio::time::sleep(Duration::from_millis(wait)).await;
                Ok(n)
            }) as FetchFuture<u64>
        });

        let first = {
            let query = query.clone();
            tokio::spawn(async move { query.refresh().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = {
            let query = query.clone();
            tokio::spawn(async move { query.refresh().await })
        };

        first.await.unwrap();
        // The older request was discarded while the newer one is in flight.
        assert!(query.snapshot().is_loading);

        second.await.unwrap();
        let snap = query.snapshot();
        assert!(!snap.is_loading);
        assert_eq!(snap.data.as_deref(), Some(&1));
    }
}
