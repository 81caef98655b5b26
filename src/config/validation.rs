//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Returns all errors,
//! not just the first, so a bad config can be fixed in one pass.

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    InvalidBackendAddress(String),
    ZeroProbeTimeout,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address '{}'", addr)
            }
            ValidationError::InvalidBackendAddress(addr) => {
                write!(f, "invalid backend address '{}'", addr)
            }
            ValidationError::ZeroProbeTimeout => {
                write!(f, "health_check.timeout_secs must be greater than zero")
            }
        }
    }
}

/// Validate a parsed configuration.
///
/// An empty backend list is accepted: the pool is allowed to start empty and
/// the server answers 503 until restarted with reachable backends.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for address in &config.backends {
        if address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBackendAddress(address.clone()));
        }
    }

    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
