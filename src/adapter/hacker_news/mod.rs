mod client;

pub use client::{HackerNewsClient, HackerNewsConfig, normalize_base_url};
