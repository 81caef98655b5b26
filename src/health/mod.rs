//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Pool initialization:
//!     probe each configured address once
//!     → only reachable addresses are admitted
//!
//! Selection time (per request):
//!     probe the candidate before forwarding
//!     → dead candidates are skipped for this selection
//! ```
//!
//! # Design Decisions
//! - The probe is a pure boundary operation; the `alive` state update
//!   lives on `Backend`, keeping the synchronization boundary explicit
//! - No background check loop: liveness is point-in-time, captured
//!   synchronously on the request path
//! - Health state is per-backend, not per-pool

pub mod probe;

pub use probe::probe;
