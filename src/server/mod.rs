pub mod error;
pub mod handlers;
pub mod identity;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use std::net::{AddrParseError, SocketAddr};

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::ratelimit::RateLimitDecision;
use crate::summary::SummaryError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid bind address: {0}")]
    Address(#[from] AddrParseError),

    #[error("Server I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to set up summary generator: {0}")]
    Generator(#[from] SummaryError),
}

/// Create the API router.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let router = Router::new()
        .route(
            "/api/analyze",
            post(handlers::analyze).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors_layer(allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS for browser clients; `None` when no origins are configured.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([
            HeaderName::from_static(LIMIT_HEADER),
            HeaderName::from_static(REMAINING_HEADER),
            HeaderName::from_static(RESET_HEADER),
        ])
        .max_age(std::time::Duration::from_secs(600));

    if origins.iter().any(|o| o == "*") {
        Some(layer.allow_origin(Any))
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        Some(layer.allow_origin(origins))
    }
}

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota headers sent with successful and rate-limited responses.
pub fn rate_limit_headers(decision: &RateLimitDecision) -> [(HeaderName, HeaderValue); 3] {
    [
        (HeaderName::from_static(LIMIT_HEADER), HeaderValue::from(decision.limit)),
        (HeaderName::from_static(REMAINING_HEADER), HeaderValue::from(decision.remaining)),
        (HeaderName::from_static(RESET_HEADER), HeaderValue::from(decision.reset_at)),
    ]
}

/// Bind and serve until Ctrl+C.
pub async fn serve(config: &Config) -> Result<(), ServerError> {
    let state = AppState::from_config(config)?;
    if state.generator.is_none() {
        warn!("no language model API key configured, every summary will be the fallback");
    }

    let app = create_router(state, &config.server.allowed_origins);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
