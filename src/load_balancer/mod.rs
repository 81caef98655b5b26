//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives
//!     → pool.rs  select_next(): round robin with live-skip,
//!       bounded at one full cycle under the pool lock
//!     → backend.rs  forward(): rewrite request for the chosen
//!       origin and relay the response
//! ```
//!
//! # Design Decisions
//! - Membership is fixed at initialization; only addresses observed
//!   alive at startup are admitted
//! - Liveness is re-probed at selection time, never read from a cache
//! - Unavailability is a value (`None`), not an error

pub mod backend;
pub mod pool;

pub use backend::Backend;
pub use pool::BackendPool;
