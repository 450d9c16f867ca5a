//! HTTP handlers.

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};

use super::error::{ApiError, ApiResult};
use super::identity::client_identity;
use super::rate_limit_headers;
use super::state::AppState;
use crate::pr::parse_pr_url;
use crate::summary::build_script;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Kept untyped so a non-string value is reported like a missing one.
    #[serde(rename = "prUrl", default)]
    pub pr_url: Option<serde_json::Value>,
}

/// `POST /api/analyze`: PR URL in, `{meta, summary, style}` out.
///
/// The URL is validated before anything touches the network; the quota is
/// counted before GitHub is called. Summary failures never surface here.
pub async fn analyze(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = body.map_err(|e| {
        debug!(error = %e, "rejected request body");
        ApiError::bad_request("prUrl is required")
    })?;

    let pr_url = request
        .pr_url
        .as_ref()
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::bad_request("prUrl is required"))?;

    let parsed = parse_pr_url(pr_url).map_err(|_| ApiError::bad_request("Invalid PR URL format"))?;

    let decision = match &state.rate_limiter {
        Some(limiter) => {
            let identity = client_identity(&headers, connect_info.map(|ConnectInfo(addr)| addr));
            let decision = limiter.check(&identity, Utc::now()).await;
            if !decision.allowed {
                return Err(ApiError::RateLimited(decision));
            }
            Some(decision)
        }
        None => None,
    };

    let span = info_span!("analyze", repo = %parsed.repo_name(), pr = parsed.pr_number);
    let script = async {
        info!("fetching pull request");
        let pull_request = state.github.fetch_pull_request(&parsed).await?;
        info!(
            files = pull_request.files_changed,
            additions = pull_request.additions,
            deletions = pull_request.deletions,
            "fetched PR metadata"
        );

        let script = build_script(state.generator.as_deref(), &pull_request).await;
        Ok::<_, ApiError>(script)
    }
    .instrument(span)
    .await?;

    let response = match decision {
        Some(decision) => (rate_limit_headers(&decision), Json(script)).into_response(),
        None => Json(script).into_response(),
    };
    Ok(response)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
