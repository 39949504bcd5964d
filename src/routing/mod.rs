//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Derivation (once, at startup):
//!     EventRegistry (registration order)
//!     → skip descriptors without an ActionSpec
//!     → case.rs (kebab-case action name) or explicit path
//!     → derive.rs (validate, detect collisions)
//!     → Vec<ActionRoute>, frozen for the process lifetime
//!
//! Per request:
//!     axum matches the static route table built from Vec<ActionRoute>
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Duplicate derived paths fail startup instead of shadowing each other
//! - Every derived route accepts POST only

pub mod case;
pub mod derive;

pub use case::kebab_case;
pub use derive::{derive_path, derive_routes, ActionRoute, RouteError};
