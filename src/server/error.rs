//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use super::rate_limit_headers;
use crate::pr::PrError;
use crate::ratelimit::RateLimitDecision;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Rate limit exceeded")]
    RateLimited(RateLimitDecision),

    /// A non-404 failure status from GitHub, passed through.
    #[error("Failed to fetch PR")]
    Upstream(StatusCode),

    #[error("Failed to reach GitHub")]
    BadGateway,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(status) => *status,
            ApiError::BadGateway => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PrError> for ApiError {
    fn from(err: PrError) -> Self {
        match err {
            PrError::NotFound => ApiError::NotFound(err.to_string()),
            PrError::InvalidUrl(_) => ApiError::bad_request("Invalid PR URL format"),
            PrError::Upstream { status } => {
                ApiError::Upstream(StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY))
            }
            PrError::ApiRequest(_) => ApiError::BadGateway,
            PrError::DiffParse(msg) => ApiError::Internal(msg),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reset_at: Option<i64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            reset_at: match &self {
                ApiError::RateLimited(decision) => Some(decision.reset_at),
                _ => None,
            },
        };

        match self {
            ApiError::RateLimited(decision) => {
                (status, rate_limit_headers(&decision), Json(body)).into_response()
            }
            _ => (status, Json(body)).into_response(),
        }
    }
}
