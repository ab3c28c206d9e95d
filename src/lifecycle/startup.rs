//! Startup orchestration.
//!
//! # Responsibilities
//! - Decode the host payload
//! - Fold explicit values into the process defaults
//! - Start the diagnostics server when requested
//!
//! # Design Decisions
//! - Fail fast: any startup error is returned, no retries
//! - Defaults are a value, not globals; the caller's copy is never mutated
//! - Diagnostics start last, after every other field is settled

use std::time::Duration;

use thiserror::Error;

use crate::config::{decode_payload, DecodeError, StartupArgs};
use crate::diagnostics::{DiagnosticsHandle, DiagnosticsServer};
use crate::net::{PortAllocationError, TlsSettings, DEFAULT_BIND_HOST};

/// Port sentinel meaning "let the OS choose".
pub const OS_ASSIGNED_PORT: &str = "0";

/// Liveness-check timeout used when the host does not set one.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_millis(1500);

/// Log level used before (or without) a decoded payload. logrus `error`.
pub const DEFAULT_LOG_LEVEL: u8 = 2;

/// Error type for plugin startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    PortAllocation(#[from] PortAllocationError),
}

/// Values the rest of the plugin reads after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDefaults {
    /// Port the plugin's RPC server listens on, or [`OS_ASSIGNED_PORT`].
    pub listen_port: String,
    /// Port of the diagnostics server, or [`OS_ASSIGNED_PORT`] when disabled.
    pub diagnostics_port: String,
    /// Liveness-check timeout.
    pub ping_timeout: Duration,
    /// Interface the diagnostics server binds to.
    pub diagnostics_host: String,
}

impl Default for ProcessDefaults {
    fn default() -> Self {
        Self {
            listen_port: OS_ASSIGNED_PORT.to_string(),
            diagnostics_port: OS_ASSIGNED_PORT.to_string(),
            ping_timeout: DEFAULT_PING_TIMEOUT,
            diagnostics_host: DEFAULT_BIND_HOST.to_string(),
        }
    }
}

/// Outcome of a successful startup.
///
/// Read ports and timeouts from [`Startup::defaults`]; the decoded arguments
/// stay private so an empty `ListenPort` cannot leak past resolution.
#[derive(Debug)]
pub struct Startup {
    args: StartupArgs,
    /// Defaults with the host's explicit values applied.
    pub defaults: ProcessDefaults,
    /// Running diagnostics server, when `Pprof` was set.
    pub diagnostics: Option<DiagnosticsHandle>,
}

impl Startup {
    /// TLS material requested by the host, if any.
    pub fn tls(&self) -> Option<TlsSettings> {
        TlsSettings::from_args(&self.args)
    }
}

/// Decode `payload` and apply it on top of `defaults`.
pub async fn resolve(
    payload: Option<&str>,
    defaults: &ProcessDefaults,
) -> Result<Startup, StartupError> {
    let args = decode_payload(payload)?;
    apply(args, defaults).await
}

/// Apply already decoded arguments on top of `defaults`.
pub async fn apply(args: StartupArgs, defaults: &ProcessDefaults) -> Result<Startup, StartupError> {
    let mut resolved = defaults.clone();

    // An empty port keeps the sentinel; the host learns the real port from
    // the RPC server once it binds.
    if !args.listen_port.is_empty() {
        resolved.listen_port = args.listen_port.clone();
    }

    if !args.ping_timeout.is_zero() {
        resolved.ping_timeout = args.ping_timeout;
    }

    let diagnostics = if args.pprof {
        let handle = DiagnosticsServer::bind_and_start_on(&resolved.diagnostics_host).await?;
        resolved.diagnostics_port = handle.port();
        Some(handle)
    } else {
        None
    };

    tracing::debug!(
        listen_port = %resolved.listen_port,
        diagnostics_port = %resolved.diagnostics_port,
        ping_timeout_ms = resolved.ping_timeout.as_millis() as u64,
        "Startup arguments resolved"
    );

    Ok(Startup {
        args,
        defaults: resolved,
        diagnostics,
    })
}
