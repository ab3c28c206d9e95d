//! Startup configuration subsystem.
//!
//! # Data Flow
//! ```text
//! host payload (argv[1], JSON)
//!     → loader.rs (decode, blank → "{}")
//!     → StartupArgs (immutable)
//!     → lifecycle::startup (applies defaults, starts diagnostics)
//! ```
//!
//! # Design Decisions
//! - Missing fields keep zero values; unknown fields are ignored
//! - A malformed payload is rejected as a whole

pub mod loader;
pub mod schema;

pub use loader::{decode_payload, DecodeError};
pub use schema::StartupArgs;
