//! Backend pool management.
//!
//! # Responsibilities
//! - Own the ordered member list and the round-robin cursor
//! - Admit only addresses observed alive at initialization
//! - Select the next live backend, skipping dead ones, bounded at one
//!   full cycle

use std::sync::Arc;
use std::time::Duration;

use futures_util::future;
use tokio::sync::Mutex;

use crate::load_balancer::backend::Backend;

/// The server pool: ordered members plus the round-robin cursor.
///
/// The cursor is guarded by an async mutex so that "read cursor, probe
/// candidate, possibly write cursor" executes as one atomic unit across
/// concurrent requests. Each backend's `alive` flag is its own cell and is
/// not covered by this lock.
#[derive(Debug)]
pub struct BackendPool {
    /// Ordered members, fixed after initialization.
    members: Vec<Arc<Backend>>,
    /// Index of the last successfully used member. `None` = before first.
    cursor: Mutex<Option<usize>>,
    /// Timeout applied to every liveness probe.
    probe_timeout: Duration,
}

impl BackendPool {
    /// Build a pool from pre-constructed members, cursor before first.
    pub fn new(members: Vec<Arc<Backend>>, probe_timeout: Duration) -> Self {
        Self {
            members,
            cursor: Mutex::new(None),
            probe_timeout,
        }
    }

    /// Probe the configured addresses once and admit only those alive.
    ///
    /// Addresses that fail this first probe never enter the pool. An empty
    /// result is a valid state: the server keeps answering 503 rather than
    /// refusing to start.
    pub async fn initialize(addresses: &[String], probe_timeout: Duration) -> Self {
        tracing::info!(count = addresses.len(), "Initializing backend pool");

        let mut candidates = Vec::new();
        for address in addresses {
            match address.parse() {
                Ok(addr) => candidates.push(Arc::new(Backend::new(addr))),
                Err(e) => {
                    tracing::warn!(address = %address, error = %e, "Ignoring unparseable backend address");
                }
            }
        }

        let results = future::join_all(
            candidates
                .iter()
                .map(|backend| backend.check_alive(probe_timeout)),
        )
        .await;

        let mut members = Vec::new();
        for (backend, alive) in candidates.into_iter().zip(results) {
            if alive {
                tracing::info!(addr = %backend.addr, "Backend admitted to pool");
                members.push(backend);
            } else {
                tracing::warn!(addr = %backend.addr, "Backend dropped: initial probe failed");
            }
        }

        tracing::info!(members = members.len(), "Backend pool ready");
        Self::new(members, probe_timeout)
    }

    /// Select the next live backend in strict cyclic order.
    ///
    /// Starting just after the last used index, examines up to `n`
    /// candidates, re-probing each at selection time rather than trusting a
    /// cached flag. The first live candidate becomes the new cursor
    /// position. If the whole cycle fails the cursor still advances past
    /// every examined candidate and `None` is returned.
    pub async fn select_next(&self) -> Option<Arc<Backend>> {
        let n = self.members.len();
        if n == 0 {
            return None;
        }

        let mut cursor = self.cursor.lock().await;
        let start = match *cursor {
            Some(latest) => (latest + 1) % n,
            None => 0,
        };

        for step in 0..n {
            let index = (start + step) % n;
            let backend = &self.members[index];

            if backend.check_alive(self.probe_timeout).await {
                *cursor = Some(index);
                return Some(Arc::clone(backend));
            }

            tracing::debug!(addr = %backend.addr, "Skipping dead backend");
            *cursor = Some(index);
        }

        tracing::warn!(members = n, "All backends failed their probe");
        None
    }

    /// Number of admitted members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
