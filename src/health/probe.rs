//! Transport-level reachability probe.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

/// Probe a backend address with a bounded TCP connection attempt.
///
/// Reports reachability without side effects beyond the attempt itself.
/// Both connect errors and timeouts count as unreachable.
pub async fn probe(addr: SocketAddr, timeout: Duration) -> bool {
    match time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_stream)) => {
            tracing::debug!(addr = %addr, "Probe succeeded");
            true
        }
        Ok(Err(e)) => {
            tracing::debug!(addr = %addr, error = %e, "Probe failed: connection error");
            false
        }
        Err(_) => {
            tracing::debug!(addr = %addr, timeout_ms = timeout.as_millis() as u64, "Probe failed: timeout");
            false
        }
    }
}
