use crate::domain::{PagedResult, Story};
use crate::handler::error::ErrorResponse;
use crate::port::StoryQuery;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

pub const NOT_FOUND_MESSAGE: &str = "No stories found.";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Clone)]
pub struct StoriesState {
    pub query: Arc<dyn StoryQuery>,
    /// Answer an empty page with 404 instead of 200 and an empty body.
    pub empty_as_not_found: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoriesParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub query: Option<String>,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// Handler for GET /api/stories
pub async fn get_stories(
    State(state): State<StoriesState>,
    Query(params): Query<StoriesParams>,
) -> Response {
    info!(
        page = params.page,
        page_size = params.page_size,
        query = params.query.as_deref().unwrap_or(""),
        "Fetching stories"
    );

    match state
        .query
        .get_paged(params.page, params.page_size, params.query)
        .await
    {
        Ok(result) if result.is_empty() && state.empty_as_not_found => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(NOT_FOUND_MESSAGE)),
        )
            .into_response(),
        Ok(result) => Json::<PagedResult<Story>>(result).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handler for GET /api/stories/search
pub async fn search_stories(
    State(state): State<StoriesState>,
    Query(params): Query<SearchParams>,
) -> Response {
    info!(query = %params.query, "Searching stories");

    match state.query.search(params.query).await {
        Ok(stories) => Json(stories).into_response(),
        Err(e) => e.into_response(),
    }
}
