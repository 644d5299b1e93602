use crate::aggregator::StoryAggregator;
use crate::domain::{PagedResult, Story};
use crate::error::ServiceError;
use crate::port::StoryQuery;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Paging and title search over the aggregated collection.
pub struct StoryService {
    aggregator: Arc<StoryAggregator>,
}

impl StoryService {
    #[must_use]
    pub fn new(aggregator: Arc<StoryAggregator>) -> Self {
        Self { aggregator }
    }

    /// # Errors
    /// `InvalidArgument` for a non-positive `page` or `page_size`,
    /// `Upstream` when the collection cannot be built.
    pub async fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        query: Option<&str>,
    ) -> Result<PagedResult<Story>, ServiceError> {
        let (page, page_size) = validate_paging(page, page_size)?;
        let stories = self.aggregator.stories().await?;

        let matching: Vec<&Story> = match normalized_query(query) {
            Some(needle) => stories.iter().filter(|s| s.title_contains(&needle)).collect(),
            None => stories.iter().collect(),
        };

        let total_count = matching.len();
        let items: Vec<Story> = matching
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();

        debug!(page, page_size, total_count, returned = items.len(), "paged stories");
        Ok(PagedResult::new(items, total_count))
    }

    /// Every story whose title contains `query`; a blank query returns all.
    ///
    /// # Errors
    /// `Upstream` when the collection cannot be built.
    pub async fn search(&self, query: &str) -> Result<Vec<Story>, ServiceError> {
        let stories = self.aggregator.stories().await?;
        let found: Vec<Story> = match normalized_query(Some(query)) {
            Some(needle) => stories
                .iter()
                .filter(|s| s.title_contains(&needle))
                .cloned()
                .collect(),
            None => (*stories).clone(),
        };
        Ok(found)
    }
}

fn validate_paging(page: i64, page_size: i64) -> Result<(usize, usize), ServiceError> {
    if page < 1 {
        return Err(ServiceError::InvalidArgument(format!(
            "page must be at least 1, got {page}"
        )));
    }
    if page_size < 1 {
        return Err(ServiceError::InvalidArgument(format!(
            "pageSize must be at least 1, got {page_size}"
        )));
    }
    // Both are positive here; on 32-bit targets oversized values saturate.
    let page = usize::try_from(page).unwrap_or(usize::MAX);
    let page_size = usize::try_from(page_size).unwrap_or(usize::MAX);
    Ok((page, page_size))
}

/// Lowercased, trimmed keyword, or `None` when blank.
fn normalized_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

impl StoryQuery for StoryService {
    fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        query: Option<String>,
    ) -> Pin<Box<dyn Future<Output = Result<PagedResult<Story>, ServiceError>> + Send + '_>> {
        Box::pin(async move { StoryService::get_paged(self, page, page_size, query.as_deref()).await })
    }

    fn search(
        &self,
        query: String,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Story>, ServiceError>> + Send + '_>> {
        Box::pin(async move { StoryService::search(self, &query).await })
    }
}
