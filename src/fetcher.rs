//! Per-session SponsorBlock segment fetching.
//!
//! A [`SegmentFetcher`] remembers the last video it was asked about and only
//! talks to the instance again once a different video comes along. Results
//! are kept until the next video replaces them and are published as a
//! [`FetchStatus`] that playback code can poll or subscribe to.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures::StreamExt;
use reqwest::StatusCode;
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;

use crate::{
    api,
    segment::{self, Segment},
    util::{FetchError, HttpClient, Transport},
};

/// The cached result: `segments` always belong to `video_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    pub video_id: Option<String>,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    Idle,
    Pending { video_id: String },
    Loaded { video_id: String, segments: Vec<Segment> },
    Failed { video_id: String, reason: String },
}

impl FetchStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchStatus::Pending { .. })
    }
}

/// What a call to [`SegmentFetcher::load_segments`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No instance configured, nothing was requested.
    NotConfigured,
    /// The video is already loaded or being loaded.
    AlreadyLoaded,
    /// No categories enabled, nothing was requested.
    NoCategories,
    Loaded(usize),
    Failed,
    /// Another video was requested while this one was in flight; the
    /// response was thrown away.
    Superseded,
}

struct Tracked {
    state: FetchState,
    generation: u64,
}

struct Inner {
    transport: Arc<dyn Transport>,
    url: Option<String>,
    tracked: Mutex<Tracked>,
    status: watch::Sender<FetchStatus>,
}

struct PendingRequest {
    url: String,
    video_id: String,
    categories: BTreeSet<String>,
    generation: u64,
}

/// Handle to one playback session's segment cache. Clones share state.
#[derive(Clone)]
pub struct SegmentFetcher {
    inner: Arc<Inner>,
}

impl SegmentFetcher {
    pub fn new(client: HttpClient, instance: &str) -> Self {
        Self::with_transport(Arc::new(client), instance)
    }

    pub fn with_transport(transport: Arc<dyn Transport>, instance: &str) -> Self {
        let (status, _) = watch::channel(FetchStatus::Idle);

        Self {
            inner: Arc::new(Inner {
                transport,
                url: api::skip_segments_url(instance),
                tracked: Mutex::new(Tracked {
                    state: FetchState::default(),
                    generation: 0,
                }),
                status,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tracked> {
        self.inner
            .tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_configured(&self) -> bool {
        self.inner.url.is_some()
    }

    pub fn state(&self) -> FetchState {
        self.lock().state.clone()
    }

    pub fn video_id(&self) -> Option<String> {
        self.lock().state.video_id.clone()
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.lock().state.segments.clone()
    }

    pub fn status(&self) -> FetchStatus {
        self.inner.status.borrow().clone()
    }

    /// Stream of status changes, starting with the current status.
    pub fn subscribe(&self) -> WatchStream<FetchStatus> {
        WatchStream::new(self.inner.status.subscribe())
    }

    /// Waits until no request is in flight and returns the status.
    pub async fn settled(&self) -> FetchStatus {
        let mut updates = self.subscribe();
        while let Some(status) = updates.next().await {
            if !status.is_pending() {
                return status;
            }
        }

        self.status()
    }

    /// Loads segments for `video_id`, restricted to `categories`.
    ///
    /// Resolves once the state reflects the outcome. A video that is already
    /// tracked is never requested twice, and errors only show up as an empty
    /// segment list, a `Failed` status and a log line.
    pub async fn load_segments(
        &self,
        video_id: &str,
        categories: &BTreeSet<String>,
    ) -> LoadOutcome {
        match self.begin(video_id, categories) {
            Ok(request) => self.complete(request).await,
            Err(outcome) => outcome,
        }
    }

    /// Like [`load_segments`](Self::load_segments), but runs the request on
    /// the tokio runtime. The video is marked as tracked before this returns,
    /// so a second call for it right away is still a no-op.
    pub fn spawn_load(
        &self,
        video_id: &str,
        categories: &BTreeSet<String>,
    ) -> JoinHandle<LoadOutcome> {
        match self.begin(video_id, categories) {
            Ok(request) => {
                let fetcher = self.clone();
                tokio::spawn(async move { fetcher.complete(request).await })
            }
            Err(outcome) => tokio::spawn(async move { outcome }),
        }
    }

    fn begin(
        &self,
        video_id: &str,
        categories: &BTreeSet<String>,
    ) -> Result<PendingRequest, LoadOutcome> {
        let url = match &self.inner.url {
            Some(url) => url.clone(),
            None => {
                debug!("{}, not loading segments", FetchError::ConfigurationMissing);
                return Err(LoadOutcome::NotConfigured);
            }
        };

        let mut tracked = self.lock();
        if tracked.state.video_id.as_deref() == Some(video_id) {
            return Err(LoadOutcome::AlreadyLoaded);
        }
        if categories.is_empty() {
            debug!("no categories enabled, not loading segments for {}", video_id);
            return Err(LoadOutcome::NoCategories);
        }

        tracked.generation += 1;
        tracked.state = FetchState {
            video_id: Some(video_id.to_string()),
            segments: Vec::new(),
        };
        self.inner.status.send_replace(FetchStatus::Pending {
            video_id: video_id.to_string(),
        });

        Ok(PendingRequest {
            url,
            video_id: video_id.to_string(),
            categories: categories.clone(),
            generation: tracked.generation,
        })
    }

    async fn complete(&self, request: PendingRequest) -> LoadOutcome {
        let result = self.request(&request).await;

        let mut tracked = self.lock();
        if tracked.generation != request.generation {
            debug!(
                "discarding segments for {}, no longer the current video",
                request.video_id
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(segments) => {
                info!(
                    "loaded {} SponsorBlock segments for {}",
                    segments.len(),
                    request.video_id
                );
                for s in &segments {
                    info!("{} -> {} ({})", s.start, s.end, s.category);
                }

                let count = segments.len();
                tracked.state.segments = segments.clone();
                self.inner.status.send_replace(FetchStatus::Loaded {
                    video_id: request.video_id,
                    segments,
                });
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                match &e {
                    FetchError::Status(StatusCode::NOT_FOUND) => {
                        info!("no SponsorBlock segments for {}", request.video_id)
                    }
                    _ => error!("failed to load SponsorBlock segments: {}", e),
                }

                tracked.state.segments.clear();
                self.inner.status.send_replace(FetchStatus::Failed {
                    video_id: request.video_id,
                    reason: e.to_string(),
                });
                LoadOutcome::Failed
            }
        }
    }

    async fn request(&self, request: &PendingRequest) -> Result<Vec<Segment>, FetchError> {
        let query =
            api::query(&request.video_id, &request.categories).map_err(FetchError::Encode)?;
        let body = self.inner.transport.get_text(&request.url, &query).await?;

        Ok(segment::parse_segments(&body)?)
    }
}
