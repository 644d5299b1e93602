use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Failure talking to the upstream content API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport failure or a non-success status from upstream.
    #[error("Upstream request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body arrived but could not be parsed.
    #[error("Failed to decode upstream response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid upstream URL for {path}: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

impl UpstreamError {
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Errors surfaced by the query service to the transport layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
