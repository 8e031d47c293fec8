/// Unified error handling module
use crate::engine::{DateParseError, RangeTooLarge};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    RangeTooLarge(#[from] RangeTooLarge),

    #[error("Please select a start and end date before applying filters.")]
    NoActiveQuery,

    #[error("External API error: {0}")]
    ExternalApi(#[from] reqwest::Error),

    #[error("Upstream returned status {status} for {what}")]
    UpstreamStatus { status: u16, what: String },

    #[error("Malformed upstream payload: {0}")]
    Upstream(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Stable machine-readable code for the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::RangeTooLarge(_) => "RANGE_TOO_LARGE",
            ApiError::NoActiveQuery => "NO_ACTIVE_QUERY",
            ApiError::ExternalApi(e) => match e.status() {
                Some(status) => upstream_code(status.as_u16()),
                None => "UPSTREAM_ERROR",
            },
            ApiError::UpstreamStatus { status, .. } => upstream_code(*status),
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// Failures of the upstream collaborator (as opposed to bad user input)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ApiError::ExternalApi(_) | ApiError::UpstreamStatus { .. } | ApiError::Upstream(_)
        )
    }
}

fn upstream_code(status: u16) -> &'static str {
    match status {
        403 => "UPSTREAM_403",
        404 => "UPSTREAM_404",
        429 => "UPSTREAM_429",
        500..=599 => "UPSTREAM_5XX",
        _ => "UPSTREAM_ERROR",
    }
}

impl From<DateParseError> for ApiError {
    fn from(err: DateParseError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        // Errors travel in the envelope, the status is always 200
        (StatusCode::OK, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
