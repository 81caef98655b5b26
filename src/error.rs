//! Error taxonomy for the request path.
//!
//! A failed liveness probe is deliberately not represented here: it is
//! recorded as backend state (`alive = false`) and causes a skip during
//! selection. Only outcomes the caller can observe become error values.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Transport failure while relaying a request to a chosen backend.
///
/// Never retried internally; the router surfaces it as a gateway error.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to rewrite request for upstream: {0}")]
    Rewrite(String),

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
}

/// Terminal failure for a single proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Every pool member failed its probe within one cycle, or the pool is empty.
    #[error("no backend available")]
    PoolExhausted,

    /// The request was already in flight to a chosen backend when transport failed.
    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::PoolExhausted => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Forward(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Plain-text body returned to the caller. Internal detail stays out of
    /// the HTTP boundary.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProxyError::PoolExhausted => "No Servers Available",
            ProxyError::Forward(_) => "Upstream request failed",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), self.user_message()).into_response()
    }
}
