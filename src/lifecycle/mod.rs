//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Decode payload → Apply defaults → [Pprof] start diagnostics
//!
//! Supervision (supervisor.rs):
//!     Diagnostics loop fails → log → exit or abort
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → trigger shutdown → diagnostics loop drains
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::Shutdown;
pub use startup::{
    apply, resolve, ProcessDefaults, Startup, StartupError, DEFAULT_LOG_LEVEL,
    DEFAULT_PING_TIMEOUT, OS_ASSIGNED_PORT,
};
pub use supervisor::{FailFast, FATAL_SERVE_EXIT_CODE};
