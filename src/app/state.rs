use crate::adapter::hacker_news::{HackerNewsClient, HackerNewsConfig};
use crate::aggregator::{StoryAggregator, StoryCache};
use crate::config::Settings;
use crate::error::FeedError;
use crate::handler::stories::StoriesState;
use crate::port::{StoryQuery, StorySource};
use crate::service::StoryService;
use std::sync::Arc;

/// Shared application state holding the wired query service.
pub struct AppState {
    pub stories: StoriesState,
}

impl AppState {
    /// Wire the Hacker News client, cache, aggregator and query service.
    ///
    /// # Errors
    /// Fails when the upstream client cannot be built from the settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, FeedError> {
        let client = HackerNewsClient::new(&HackerNewsConfig {
            base_url: settings.hacker_news_api_url.clone(),
            timeout: settings.upstream_timeout(),
        })?;
        tracing::info!(base_url = %client.base_url(), "Upstream client ready");

        let source: Arc<dyn StorySource> = Arc::new(client);
        let cache = Arc::new(StoryCache::new(settings.cache_ttl()));
        let aggregator = Arc::new(StoryAggregator::new(
            source,
            cache,
            settings.aggregation_policy(),
        ));
        let query: Arc<dyn StoryQuery> = Arc::new(StoryService::new(aggregator));

        Ok(Self {
            stories: StoriesState {
                query,
                empty_as_not_found: settings.empty_as_not_found,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str) -> Settings {
        Settings {
            hacker_news_api_url: url.into(),
            http_port: 5000,
            story_limit: 200,
            cache_ttl_secs: 600,
            require_url: true,
            empty_as_not_found: false,
            upstream_timeout_secs: 10,
        }
    }

    #[test]
    fn test_from_settings_wires_state() {
        let state = AppState::from_settings(&settings("https://hacker-news.firebaseio.com/v0")).unwrap();
        assert!(!state.stories.empty_as_not_found);
    }

    #[test]
    fn test_from_settings_rejects_bad_url() {
        assert!(AppState::from_settings(&settings("::nope")).is_err());
    }
}
