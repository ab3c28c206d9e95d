//! Diagnostics endpoint subsystem.
//!
//! # Data Flow
//! ```text
//! net::listener (ephemeral port)
//!     → router.rs (fixed /debug/pprof/* route table)
//!     → server.rs (spawn serving loop, return handle)
//!     → handlers.rs (index, cmdline, profile, symbol, trace)
//! ```
//!
//! # Design Decisions
//! - Serving never blocks startup; the caller gets a handle back
//! - A failed serving loop is reported through the handle, and the caller
//!   decides whether it ends the process (see `lifecycle::supervisor`)
//! - No authentication; the port is only handed to the host

pub mod handlers;
pub mod router;
pub mod server;

pub use router::build_router;
pub use server::{DiagnosticsHandle, DiagnosticsServer, FatalServeError};
