//! Plugin bootstrap library.
//!
//! Resolves the startup payload handed over by the host process and, when
//! asked, exposes a diagnostics endpoint on an ephemeral port.

pub mod config;
pub mod diagnostics;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::StartupArgs;
pub use diagnostics::{DiagnosticsHandle, DiagnosticsServer};
pub use lifecycle::{resolve, ProcessDefaults, Startup, StartupError};
