//! Observability subsystem.
//!
//! Every module logs through `tracing` with structured fields; this module
//! only owns subscriber setup.

pub mod logging;
