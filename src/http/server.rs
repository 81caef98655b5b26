//! HTTP server setup and request routing.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (tracing, request ID, timeout)
//! - Select a backend per request and relay its response
//! - Answer 503 when no backend is available, 502 on forward failure

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::load_balancer::pool::BackendPool;
use crate::observability::metrics;

/// Application state injected into the proxy handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<BackendPool>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    pool: Arc<BackendPool>,
}

impl HttpServer {
    /// Create a new server: probe the configured backends, build the pool,
    /// and wire up the router.
    pub async fn new(config: ProxyConfig) -> Self {
        let pool = Arc::new(
            BackendPool::initialize(
                &config.backends,
                Duration::from_secs(config.health_check.timeout_secs),
            )
            .await,
        );

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            pool: Arc::clone(&pool),
            client,
        };

        let router = Self::build_router(&config, state);
        Self { router, pool }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.pool.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service()).await
    }

    /// The pool backing this server.
    pub fn pool(&self) -> &Arc<BackendPool> {
        &self.pool
    }
}

/// Main proxy handler: select a live backend and relay through it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    match forward_to_backend(&state, request).await {
        Ok((response, backend_addr)) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                backend = %backend_addr,
                status = %response.status(),
                "Request forwarded"
            );
            metrics::record_request(&method, response.status().as_u16(), &backend_addr, start_time);
            response
        }
        Err(err) => {
            match &err {
                ProxyError::PoolExhausted => {
                    tracing::warn!(request_id = %request_id, method = %method, path = %path, "No servers available");
                }
                ProxyError::Forward(e) => {
                    tracing::error!(request_id = %request_id, method = %method, path = %path, error = %e, "Upstream request failed");
                }
            }
            metrics::record_request(&method, err.status_code().as_u16(), "none", start_time);
            err.into_response()
        }
    }
}

/// One selection plus one forward. A transport failure after the backend was
/// chosen is terminal; it is never retried against another backend.
async fn forward_to_backend(
    state: &AppState,
    request: Request<Body>,
) -> Result<(Response, String), ProxyError> {
    let backend = state
        .pool
        .select_next()
        .await
        .ok_or(ProxyError::PoolExhausted)?;

    let response = backend.forward(&state.client, request).await?;
    Ok((response, backend.addr.to_string()))
}
