//! End-to-end tests: proxy in front of mock origins.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use load_balancer::config::ProxyConfig;
use load_balancer::http::HttpServer;

mod common;

/// Boot a proxy on an ephemeral port in front of the given backends.
async fn spawn_proxy(backends: Vec<String>) -> SocketAddr {
    let config = ProxyConfig {
        backends,
        ..ProxyConfig::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).await;
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

#[tokio::test]
async fn requests_rotate_across_backends() {
    let (b1, _h1) = common::start_mock_backend("backend-one").await;
    let (b2, _h2) = common::start_mock_backend("backend-two").await;
    let proxy = spawn_proxy(vec![b1.to_string(), b2.to_string()]).await;

    let client = reqwest::Client::new();
    let mut bodies = Vec::new();
    for _ in 0..4 {
        let res = client
            .get(format!("http://{}/", proxy))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert!(res.headers().contains_key("x-request-id"));
        bodies.push(res.text().await.unwrap());
    }

    // Fresh pool, cursor before first: strict alternation in config order.
    assert_eq!(
        bodies,
        vec!["backend-one", "backend-two", "backend-one", "backend-two"]
    );
}

#[tokio::test]
async fn unavailable_when_no_backend_admitted() {
    // Both addresses fail their startup probe, so the pool is empty.
    let proxy = spawn_proxy(vec![
        common::dead_addr().to_string(),
        common::dead_addr().to_string(),
    ])
    .await;

    let res = reqwest::get(format!("http://{}/", proxy)).await.unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(res.text().await.unwrap(), "No Servers Available");
}

#[tokio::test]
async fn forwarding_headers_reach_the_origin() {
    let (origin, _h) = common::start_echo_backend().await;
    let proxy = spawn_proxy(vec![origin.to_string()]).await;

    let res = reqwest::get(format!("http://{}/some/path", proxy))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let head = res.text().await.unwrap();
    assert!(head.contains("GET /some/path HTTP/1.1"));
    assert!(head.contains(&format!("x-origin-host: {}", origin)));
    assert!(head.contains("x-forwarded-host:"));
}

#[tokio::test]
async fn failed_backend_is_skipped() {
    let (b1, h1) = common::start_mock_backend("backend-one").await;
    let (b2, _h2) = common::start_mock_backend("backend-two").await;
    let proxy = spawn_proxy(vec![b1.to_string(), b2.to_string()]).await;

    let client = reqwest::Client::new();
    let first = client
        .get(format!("http://{}/", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(first.text().await.unwrap(), "backend-one");

    // Kill the first backend; its port closes and probes start failing.
    h1.abort();
    tokio::time::sleep(Duration::from_millis(50)).await;

    for _ in 0..3 {
        let res = client
            .get(format!("http://{}/", proxy))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), "backend-two");
    }
}

#[tokio::test]
async fn transport_failure_after_selection_is_a_gateway_error() {
    // Probes see a listening socket, but every forwarded request dies.
    let (origin, _h) = common::start_resetting_backend().await;
    let proxy = spawn_proxy(vec![origin.to_string()]).await;

    let res = reqwest::get(format!("http://{}/", proxy)).await.unwrap();
    assert_eq!(res.status(), 502);
    assert_eq!(res.text().await.unwrap(), "Upstream request failed");
}
