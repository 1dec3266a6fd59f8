use crate::errors::{CollateralError, FundingError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error returned by API handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream { status: StatusCode, message: String },
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Like `From<FundingError>`, but an upstream HTTP status is relayed
    /// as-is instead of becoming 502.
    pub fn relay_status(e: FundingError) -> Self {
        match e {
            FundingError::Upstream {
                status: Some(code),
                ..
            } => Self::Upstream {
                status: StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY),
                message: format!("Upstream error: {code}"),
            },
            other => other.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Upstream { status, message } => {
                tracing::warn!("Upstream error: {message}");
                (status, message)
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<FundingError> for ApiError {
    fn from(e: FundingError) -> Self {
        match e {
            FundingError::InvalidArgument(msg) => Self::BadRequest(msg),
            other => Self::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: other.to_string(),
            },
        }
    }
}

impl From<CollateralError> for ApiError {
    fn from(e: CollateralError) -> Self {
        Self::BadRequest(e.to_string())
    }
}
