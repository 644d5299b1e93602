//! Shared test support utilities
//!
//! Provides an in-memory `MockStorySource` for unit and integration tests.

use crate::domain::{Story, StoryId};
use crate::error::UpstreamError;
use crate::port::StorySource;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// A linked story with the given id and title.
#[must_use]
pub fn story(id: StoryId, title: &str) -> Story {
    Story {
        by: "tester".to_string(),
        id,
        score: 1,
        time: 1_700_000_000,
        title: title.to_string(),
        kind: "story".to_string(),
        url: Some(format!("https://example.com/{id}")),
        ..Story::default()
    }
}

fn decode_failure(what: &str) -> UpstreamError {
    UpstreamError::Decode {
        url: format!("mock://{what}"),
        source: <serde_json::Error as serde::de::Error>::custom("mock decode failure"),
    }
}

/// Story source backed by in-memory maps that records how it is called.
#[derive(Default)]
pub struct MockStorySource {
    ids: Mutex<Vec<StoryId>>,
    stories: Mutex<HashMap<StoryId, Story>>,
    failing: Mutex<HashSet<StoryId>>,
    panicking: Mutex<HashSet<StoryId>>,
    fail_list: AtomicBool,
    item_delay: Option<Duration>,
    list_calls: AtomicUsize,
    item_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockStorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every item fetch sleeps for `delay` before answering.
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = Some(delay);
        self
    }

    pub fn set_ids(&self, ids: Vec<StoryId>) {
        *self.ids.lock() = ids;
    }

    pub fn add_story(&self, story: Story) {
        self.stories.lock().insert(story.id, story);
    }

    pub fn fail_story(&self, id: StoryId) {
        self.failing.lock().insert(id);
    }

    /// Fetching `id` panics, as a bug inside the source would.
    pub fn panic_on_story(&self, id: StoryId) {
        self.panicking.lock().insert(id);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn item_calls(&self) -> usize {
        self.item_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Counts a fetch as in flight until it finishes or is dropped.
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StorySource for MockStorySource {
    fn list_new_story_ids(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoryId>, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(decode_failure("newstories.json"));
            }
            Ok(self.ids.lock().clone())
        })
    }

    fn get_story(
        &self,
        id: StoryId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Story>, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            self.item_calls.fetch_add(1, Ordering::SeqCst);
            let _in_flight = InFlight::enter(&self.in_flight, &self.max_in_flight);

            if let Some(delay) = self.item_delay {
                tokio::time::sleep(delay).await;
            }

            if self.panicking.lock().contains(&id) {
                panic!("mock panic for story {id}");
            }
            if self.failing.lock().contains(&id) {
                Err(decode_failure(&format!("item/{id}.json")))
            } else {
                Ok(self.stories.lock().get(&id).cloned())
            }
        })
    }
}
