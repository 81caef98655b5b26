//! Round-robin HTTP load balancer library.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────┐
//!                      │              LOAD BALANCER                │
//!                      │                                           │
//!   Client Request     │  ┌─────────┐     ┌─────────────────────┐ │
//!   ───────────────────┼─▶│  http   │────▶│   load_balancer     │ │
//!                      │  │ server  │     │ pool (round robin)  │ │
//!                      │  └─────────┘     └──────────┬──────────┘ │
//!                      │                             │            │
//!                      │                  ┌──────────▼──────────┐ │
//!   Client Response    │                  │      backend        │ │
//!   ◀──────────────────┼──────────────────│  probe + forward    │◀┼──── Backend
//!                      │                  └─────────────────────┘ │     Server
//!                      │                                           │
//!                      │  ┌─────────────────────────────────────┐ │
//!                      │  │        Cross-Cutting Concerns       │ │
//!                      │  │  ┌────────┐ ┌────────┐ ┌─────────┐  │ │
//!                      │  │  │ config │ │ health │ │observa- │  │ │
//!                      │  │  │        │ │ probe  │ │ bility  │  │ │
//!                      │  │  └────────┘ └────────┘ └─────────┘  │ │
//!                      │  └─────────────────────────────────────┘ │
//!                      └───────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod error;
pub mod http;

// Traffic management
pub mod health;
pub mod load_balancer;

// Cross-cutting concerns
pub mod observability;

pub use config::ProxyConfig;
pub use error::{ForwardError, ProxyError};
pub use http::HttpServer;
pub use load_balancer::{Backend, BackendPool};
