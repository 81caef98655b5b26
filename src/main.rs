//! Round-robin HTTP load balancer.
//!
//! Routes incoming requests across a pool of backend servers, skipping
//! backends whose liveness probe fails and answering 503 when none remain.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use load_balancer::config::loader::load_config;
use load_balancer::http::HttpServer;
use load_balancer::observability::{logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "load-balancer", version, about = "Round-robin HTTP load balancer")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability);

    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        probe_timeout_secs = config.health_check.timeout_secs,
        "load-balancer starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config).await;
    if server.pool().is_empty() {
        tracing::warn!("Backend pool is empty; all requests will receive 503");
    }

    server.run(listener).await?;

    Ok(())
}
