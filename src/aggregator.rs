//! Aggregation pass: identifier list, bounded fan-out, cache write.

use crate::cache::TtlCache;
use crate::domain::{Story, StoryId};
use crate::error::ServiceError;
use crate::port::StorySource;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Maximum item-detail requests in flight during one pass.
pub const FETCH_CONCURRENCY: usize = 5;

/// Key under which the full aggregated collection is cached.
pub const STORY_CACHE_KEY: &str = "stories:new";

pub const DEFAULT_STORY_LIMIT: usize = 200;

pub type StoryCollection = Arc<Vec<Story>>;
pub type StoryCache = TtlCache<StoryCollection>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPolicy {
    /// How many identifiers from the head of the list are fetched.
    pub story_limit: usize,
    /// Drop stories whose URL is absent or blank.
    pub require_url: bool,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            story_limit: DEFAULT_STORY_LIMIT,
            require_url: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Upstream answered `null` for the item.
    Missing,
    MissingUrl,
}

/// Result of fetching one item.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Story),
    Skipped(SkipReason),
    Failed(String),
}

/// Counts from one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    pub requested: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl AggregationReport {
    fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched(_) => self.fetched += 1,
            FetchOutcome::Skipped(_) => self.skipped += 1,
            FetchOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Builds and caches the story collection.
pub struct StoryAggregator {
    source: Arc<dyn StorySource>,
    cache: Arc<StoryCache>,
    policy: AggregationPolicy,
    /// Serializes refreshes so concurrent cache misses share one pass.
    refresh: Mutex<()>,
}

impl StoryAggregator {
    #[must_use]
    pub fn new(
        source: Arc<dyn StorySource>,
        cache: Arc<StoryCache>,
        policy: AggregationPolicy,
    ) -> Self {
        Self {
            source,
            cache,
            policy,
            refresh: Mutex::new(()),
        }
    }

    /// Returns the cached collection, running an aggregation pass on a miss.
    ///
    /// # Errors
    /// Fails when the identifier list cannot be fetched or a fetch task dies;
    /// the cache is left untouched in that case.
    pub async fn stories(&self) -> Result<StoryCollection, ServiceError> {
        if let Some(cached) = self.cache.get(STORY_CACHE_KEY) {
            debug!(count = cached.len(), "story cache hit");
            return Ok(cached);
        }

        let _guard = self.refresh.lock().await;
        // A pass that finished while we waited already filled the cache.
        if let Some(cached) = self.cache.get(STORY_CACHE_KEY) {
            debug!(count = cached.len(), "story cache filled by concurrent refresh");
            return Ok(cached);
        }

        debug!("story cache miss, starting aggregation pass");
        let (stories, _) = self.aggregate().await?;
        let stories = Arc::new(stories);
        self.cache.insert(STORY_CACHE_KEY, Arc::clone(&stories));
        Ok(stories)
    }

    /// One uncached pass over the newest identifiers.
    ///
    /// The returned stories keep the upstream identifier order.
    ///
    /// # Errors
    /// `Upstream` for the identifier-list failure, `Internal` when a fetch
    /// task panics. Per-item upstream failures are counted in the report
    /// instead.
    pub async fn aggregate(&self) -> Result<(Vec<Story>, AggregationReport), ServiceError> {
        let started = Instant::now();
        let mut ids = self.source.list_new_story_ids().await?;
        ids.truncate(self.policy.story_limit);

        // Dropping the set aborts every fetch still queued or in flight.
        let semaphore = Arc::new(Semaphore::new(FETCH_CONCURRENCY));
        let mut tasks = JoinSet::new();

        for (position, id) in ids.iter().copied().enumerate() {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let policy = self.policy;

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => fetch_one(&*source, id, policy).await,
                    Err(e) => FetchOutcome::Failed(format!("fetch permit unavailable: {e}")),
                };
                (position, id, outcome)
            });
        }

        let mut report = AggregationReport {
            requested: ids.len(),
            ..AggregationReport::default()
        };
        let mut fetched: Vec<(usize, Story)> = Vec::with_capacity(ids.len());

        while let Some(task) = tasks.join_next().await {
            let (position, id, outcome) = task.map_err(|join_error| {
                error!(error = %join_error, "story fetch task failed");
                ServiceError::Internal(format!("story fetch task failed: {join_error}"))
            })?;

            report.record(&outcome);
            match outcome {
                FetchOutcome::Fetched(story) => fetched.push((position, story)),
                FetchOutcome::Skipped(reason) => {
                    debug!(story_id = id, ?reason, "story skipped");
                }
                FetchOutcome::Failed(reason) => {
                    warn!(story_id = id, %reason, "story dropped from aggregation");
                }
            }
        }

        fetched.sort_unstable_by_key(|(position, _)| *position);
        let stories: Vec<Story> = fetched.into_iter().map(|(_, story)| story).collect();

        info!(
            requested = report.requested,
            fetched = report.fetched,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "aggregation pass complete"
        );

        Ok((stories, report))
    }
}

async fn fetch_one(source: &dyn StorySource, id: StoryId, policy: AggregationPolicy) -> FetchOutcome {
    match source.get_story(id).await {
        Ok(Some(story)) if policy.require_url && !story.has_url() => {
            FetchOutcome::Skipped(SkipReason::MissingUrl)
        }
        Ok(Some(story)) => FetchOutcome::Fetched(story),
        Ok(None) => FetchOutcome::Skipped(SkipReason::Missing),
        Err(e) => FetchOutcome::Failed(e.to_string()),
    }
}
