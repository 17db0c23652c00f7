use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::handlers::cors_headers;
use crate::models::ErrorBody;

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

// Failures talking to the backing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to backing store failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backing store answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not decode backing store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backing store url: {0}")]
    InvalidUrl(String),
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error(transparent)]
    Backend(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Backend(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::MethodNotAllowed => "Method not allowed",
            GatewayError::RateLimited => "Rate limit exceeded. Please try again later.",
            GatewayError::Backend(_) => "Failed to fetch contact information",
            GatewayError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message().to_string(),
        };
        let mut response = (self.status_code(), Json(body)).into_response();

        let headers = response.headers_mut();
        headers.extend(cors_headers());
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        response
    }
}
