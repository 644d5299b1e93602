use tracing::debug;

/// Handler for GET /api/health
pub async fn health_handler() -> &'static str {
    debug!("Health check requested");
    "Healthy"
}
