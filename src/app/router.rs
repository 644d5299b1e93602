use crate::handler::health::health_handler;
use crate::handler::stories::{StoriesState, get_stories, search_stories};
use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the HTTP router (stories, search, health).
pub fn api_router(state: StoriesState) -> Router {
    let health_router = Router::new().route("/api/health", get(health_handler));

    let stories_router = Router::new()
        .route("/api/stories", get(get_stories))
        .route("/api/stories/search", get(search_stories))
        .with_state(state);

    Router::new()
        .merge(health_router)
        .merge(stories_router)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
