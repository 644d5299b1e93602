use std::env;
use std::time::Duration;

use crate::adapter::hacker_news::normalize_base_url;
use crate::aggregator::{AggregationPolicy, DEFAULT_STORY_LIMIT};
use crate::error::FeedError;

const DEFAULT_HTTP_PORT: u16 = 5000;
const DEFAULT_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the Hacker News API, e.g. `https://hacker-news.firebaseio.com/v0/`
    pub hacker_news_api_url: String,
    pub http_port: u16,
    /// Identifiers taken from the head of `newstories.json` per pass
    pub story_limit: usize,
    /// 0 disables expiry
    pub cache_ttl_secs: u64,
    pub require_url: bool,
    pub empty_as_not_found: bool,
    pub upstream_timeout_secs: u64,
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), FeedError> {
        validate_api_url(&self.hacker_news_api_url)?;
        validate_port(self.http_port)?;
        if self.story_limit == 0 {
            return Err(FeedError::Config("Story limit cannot be 0".into()));
        }
        if self.upstream_timeout_secs == 0 {
            return Err(FeedError::Config("Upstream timeout cannot be 0".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    #[must_use]
    pub fn aggregation_policy(&self) -> AggregationPolicy {
        AggregationPolicy {
            story_limit: self.story_limit,
            require_url: self.require_url,
        }
    }

    /// Builds settings from a variable lookup, applying defaults for
    /// everything except the API URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let hacker_news_api_url = lookup("APP_HACKER_NEWS_API_URL").ok_or_else(|| {
            FeedError::Config("Missing required environment variable: APP_HACKER_NEWS_API_URL".into())
        })?;

        let settings = Self {
            hacker_news_api_url,
            http_port: parse_or(&lookup, "HTTP_PORT", DEFAULT_HTTP_PORT)?,
            story_limit: parse_or(&lookup, "APP_STORY_LIMIT", DEFAULT_STORY_LIMIT)?,
            cache_ttl_secs: parse_or(&lookup, "APP_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            require_url: parse_bool_or(&lookup, "APP_REQUIRE_URL", true)?,
            empty_as_not_found: parse_bool_or(&lookup, "APP_EMPTY_AS_NOT_FOUND", true)?,
            upstream_timeout_secs: parse_or(
                &lookup,
                "APP_UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?,
        };

        settings.validate()?;
        Ok(settings)
    }
}

/// Validates that the API URL is set and is an absolute http(s) URL.
fn validate_api_url(raw: &str) -> Result<(), FeedError> {
    if raw.trim().is_empty() {
        return Err(FeedError::Config("Hacker News API URL cannot be empty".into()));
    }
    let url = normalize_base_url(raw)
        .map_err(|e| FeedError::Config(format!("Invalid Hacker News API URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FeedError::Config(format!(
            "Hacker News API URL must use http or https, got {}",
            url.scheme()
        )));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), FeedError> {
    if port == 0 {
        return Err(FeedError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, FeedError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| FeedError::Config(format!("Invalid value for {name}: {e}"))),
    }
}

fn parse_bool_or<F>(lookup: &F, name: &str, default: bool) -> Result<bool, FeedError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(FeedError::Config(format!(
                "Invalid value for {name}: expected a boolean, got {other:?}"
            ))),
        },
    }
}

pub fn get_configuration() -> Result<Settings, FeedError> {
    Settings::from_lookup(|name| env::var(name).ok())
}
