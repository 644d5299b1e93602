pub mod router;
pub mod server;
mod state;
pub mod tracing;

pub use state::AppState;

use crate::config;
use crate::error::FeedError;
use tokio_util::sync::CancellationToken;

/// Application entry point. Initializes tracing, configuration, and starts the server.
pub async fn run() -> Result<(), FeedError> {
    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match crate::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();

    let settings = config::get_configuration()?;
    ::tracing::info!(
        http_port = settings.http_port,
        story_limit = settings.story_limit,
        cache_ttl_secs = settings.cache_ttl_secs,
        require_url = settings.require_url,
        empty_as_not_found = settings.empty_as_not_found,
        "Loaded settings"
    );

    let app_state = AppState::from_settings(&settings)?;
    let app = router::api_router(app_state.stories);

    server::serve(app, settings.http_port, CancellationToken::new()).await
}
