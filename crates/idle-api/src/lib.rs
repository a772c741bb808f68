pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::chat,
    middleware::logging,
    routes::{catalog, health},
    state::AppState,
};

pub use error::{ApiError, ApiResult};

// Headroom over the run's own limit so the run loop closes the stream first
const TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/chat", post(chat::chat_stream))
        .route("/agents", get(catalog::list_agents))
        .route("/agents/:agent_name", get(catalog::get_agent))
        .route("/models", get(catalog::list_models));

    // Compression skips text/event-stream, so chat frames are not buffered
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(state.config.server.max_duration() + TIMEOUT_MARGIN))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST, axum::http::Method::OPTIONS])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> =
                config.cors.origins.iter().filter_map(|origin| origin.parse().ok()).collect();
            cors = cors.allow_origin(AllowOrigin::list(origins));
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}
