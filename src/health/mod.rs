//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → probe.rs (HealthProbe::is_healthy, synchronous)
//!     → handler.rs (200 {healthy:true} | 503 {healthy:false})
//! ```
//!
//! # Design Decisions
//! - Probe is a trait so hosts can plug in real liveness criteria
//! - Response contract is fixed regardless of the probe used
//! - The default probe reports healthy unconditionally

pub mod handler;
pub mod probe;

pub use handler::{health_check, HealthReport};
pub use probe::{AlwaysHealthy, HealthProbe};

/// Route path of the health endpoint.
pub const HEALTH_PATH: &str = "/health";
