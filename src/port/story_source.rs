//! StorySource trait for the upstream content API.
//!
//! Lets the aggregator run against the real Hacker News client in
//! production and an in-memory source in tests.

use crate::domain::{Story, StoryId};
use crate::error::UpstreamError;
use std::future::Future;
use std::pin::Pin;

/// Read-only access to story identifiers and item details.
///
/// This trait is dyn-compatible by using boxed futures.
pub trait StorySource: Send + Sync {
    /// Identifiers of the newest stories, newest first.
    ///
    /// An empty or `null` upstream body yields an empty list.
    fn list_new_story_ids(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoryId>, UpstreamError>> + Send + '_>>;

    /// Item detail by identifier. `Ok(None)` when upstream has no such item.
    fn get_story(
        &self,
        id: StoryId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Story>, UpstreamError>> + Send + '_>>;
}
