//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Pprof requested
//!     → listener.rs (resolve host:0, bind, report port)
//!     → hand listener to diagnostics server
//!
//! TLSEnabled
//!     → tls.rs (typed paths handed to the RPC collaborator)
//! ```

pub mod listener;
pub mod tls;

pub use listener::{allocate_ephemeral_on, PortAllocationError, DEFAULT_BIND_HOST};
pub use tls::TlsSettings;
