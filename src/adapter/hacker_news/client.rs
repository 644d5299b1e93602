//! Hacker News Firebase API client.
//!
//! Two read calls: `newstories.json` for identifiers and `item/{id}.json`
//! for details. No retries; failures are logged here and handed back to
//! the caller.

use crate::domain::{Story, StoryId};
use crate::error::{FeedError, UpstreamError};
use crate::port::StorySource;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error};

const NEW_STORIES_PATH: &str = "newstories.json";

#[derive(Debug, Clone)]
pub struct HackerNewsConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HackerNewsClient {
    client: Client,
    base_url: Url,
}

/// Parses the base URL and appends a trailing `/` so that relative joins
/// keep the last path segment (`.../v0` + `item/1.json` → `.../v0/item/1.json`).
pub fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

impl HackerNewsClient {
    /// # Errors
    /// Returns `FeedError::Config` when the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &HackerNewsConfig) -> Result<Self, FeedError> {
        let base_url = normalize_base_url(&config.base_url).map_err(|e| {
            FeedError::Config(format!("Invalid Hacker News API URL {}: {e}", config.base_url))
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeedError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` relative to the base URL and decode the body as JSON.
    ///
    /// An empty body or a JSON `null` both decode to `None`.
    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, UpstreamError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| UpstreamError::InvalidUrl {
                path: path.to_string(),
                source,
            })?;

        let network = |source: reqwest::Error| UpstreamError::Network {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?;

        let body = response.bytes().await.map_err(network)?;
        debug!(url = %url, bytes = body.len(), "upstream response received");

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<T>>(&body).map_err(|source| UpstreamError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl StorySource for HackerNewsClient {
    fn list_new_story_ids(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoryId>, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            match self.fetch_json::<Vec<StoryId>>(NEW_STORIES_PATH).await {
                Ok(ids) => Ok(ids.unwrap_or_default()),
                Err(e) => {
                    error!(error = %e, "Error fetching new story IDs");
                    Err(e)
                }
            }
        })
    }

    fn get_story(
        &self,
        id: StoryId,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Story>, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            self.fetch_json::<Story>(&format!("item/{id}.json"))
                .await
                .inspect_err(|e| error!(story_id = id, error = %e, "Error fetching story"))
        })
    }
}
