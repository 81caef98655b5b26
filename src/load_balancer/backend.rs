//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Track last-known liveness (updated by probes, read for observability)
//! - Rewrite and relay one request/response pair to its origin

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{header, HeaderValue, Request, Uri};
use axum::response::Response;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use url::Url;

use crate::error::ForwardError;
use crate::health;
use crate::observability::metrics;

/// A single backend server.
#[derive(Debug)]
pub struct Backend {
    /// The address of the backend, immutable after creation.
    pub addr: SocketAddr,
    /// Pre-calculated origin URL.
    pub base_url: Url,
    /// Last probe outcome. Its own synchronized cell, independent of the
    /// pool lock, so probing one backend never serializes behind another.
    alive: AtomicBool,
}

impl Backend {
    /// Create a new backend for the given address.
    pub fn new(addr: SocketAddr) -> Self {
        let base_url = Url::parse(&format!("http://{}", addr)).unwrap();
        Self {
            addr,
            base_url,
            alive: AtomicBool::new(false),
        }
    }

    /// Probe the backend and record the outcome.
    ///
    /// The probe itself is pure; this is the one place the shared `alive`
    /// flag is written.
    pub async fn check_alive(&self, timeout: Duration) -> bool {
        let alive = health::probe(self.addr, timeout).await;
        self.alive.store(alive, Ordering::Relaxed);
        metrics::record_backend_health(&self.addr.to_string(), alive);
        alive
    }

    /// Last observed liveness. Selection never trusts this over a fresh
    /// probe; it exists for logging and metrics.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Rewrite the request for this origin and relay it.
    ///
    /// Preserves method, path, and body; points the URI at this backend and
    /// adds `x-forwarded-host` (the host the client asked for) and
    /// `x-origin-host` (the chosen origin). The origin's response is
    /// returned unmodified. Never retries; transport failures surface to
    /// the caller.
    pub async fn forward(
        &self,
        client: &Client<HttpConnector, Body>,
        request: Request<Body>,
    ) -> Result<Response, ForwardError> {
        let (mut parts, body) = request.into_parts();

        let original_host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()));

        let origin = self.base_url.authority();

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority =
            Some(Authority::from_str(origin).map_err(|e| ForwardError::Rewrite(e.to_string()))?);
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri =
            Uri::from_parts(uri_parts).map_err(|e| ForwardError::Rewrite(e.to_string()))?;

        if let Some(host) = original_host {
            if let Ok(value) = HeaderValue::from_str(&host) {
                parts.headers.insert("x-forwarded-host", value);
            }
        }
        parts.headers.insert(
            "x-origin-host",
            HeaderValue::from_str(origin).map_err(|e| ForwardError::Rewrite(e.to_string()))?,
        );

        let response = client.request(Request::from_parts(parts, body)).await?;

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_matches_address() {
        let backend = Backend::new("127.0.0.1:8081".parse().unwrap());
        assert_eq!(backend.base_url.authority(), "127.0.0.1:8081");
        assert!(!backend.is_alive());
    }

    #[tokio::test]
    async fn check_alive_tracks_probe_outcome() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let backend = Backend::new(addr);

        assert!(backend.check_alive(Duration::from_secs(1)).await);
        assert!(backend.is_alive());

        drop(listener);
        assert!(!backend.check_alive(Duration::from_secs(1)).await);
        assert!(!backend.is_alive());
    }
}
