//! Ephemeral port allocation.
//!
//! # Responsibilities
//! - Resolve the bind address with port 0
//! - Bind a TCP listener on whatever port the OS hands out
//! - Report bind failures without retrying

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{lookup_host, TcpListener};

/// Interface the diagnostics listener binds to by default.
pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";

/// Error type for port allocation.
#[derive(Debug, Error)]
pub enum PortAllocationError {
    /// The bind host could not be resolved.
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },
    /// Resolution succeeded but produced no address.
    #[error("no address found for {0}")]
    NoAddress(String),
    /// Failed to bind to the resolved address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The bound socket did not report its local address.
    #[error("failed to read bound address: {0}")]
    LocalAddr(#[source] io::Error),
}

/// Bind a listener to a free OS-assigned port on `host`.
///
/// Single attempt: the first resolved address is used and any bind error is
/// returned as-is.
pub async fn allocate_ephemeral_on(host: &str) -> Result<TcpListener, PortAllocationError> {
    let addr = lookup_host((host, 0))
        .await
        .map_err(|source| PortAllocationError::Resolve {
            host: host.to_string(),
            source,
        })?
        .next()
        .ok_or_else(|| PortAllocationError::NoAddress(host.to_string()))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| PortAllocationError::Bind { addr, source })?;

    let local_addr = listener.local_addr().map_err(PortAllocationError::LocalAddr)?;

    tracing::debug!(address = %local_addr, "Ephemeral port allocated");

    Ok(listener)
}
