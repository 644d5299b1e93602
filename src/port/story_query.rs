use crate::domain::{PagedResult, Story};
use crate::error::ServiceError;
use std::future::Future;
use std::pin::Pin;

/// Query operations the HTTP handlers depend on.
pub trait StoryQuery: Send + Sync {
    /// One page of stories, optionally filtered by a title keyword.
    ///
    /// `page` and `page_size` are 1-based and must be positive.
    fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        query: Option<String>,
    ) -> Pin<Box<dyn Future<Output = Result<PagedResult<Story>, ServiceError>> + Send + '_>>;

    /// Every cached story whose title contains `query`, unpaginated.
    fn search(
        &self,
        query: String,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Story>, ServiceError>> + Send + '_>>;
}
