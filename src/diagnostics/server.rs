//! Diagnostics server startup and its background task handle.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};

use crate::diagnostics::router::build_router;
use crate::lifecycle::Shutdown;
use crate::net::{allocate_ephemeral_on, PortAllocationError};

/// The serving loop ended abnormally after startup.
#[derive(Debug, Error)]
pub enum FatalServeError {
    #[error("diagnostics server failed: {0}")]
    Serve(#[source] io::Error),
    #[error("diagnostics server task did not complete: {0}")]
    Task(#[from] JoinError),
}

/// HTTP server for the diagnostics routes.
pub struct DiagnosticsServer {
    router: Router,
}

impl DiagnosticsServer {
    /// Create a server with every diagnostics route registered.
    pub fn new() -> Self {
        Self {
            router: build_router(),
        }
    }

    /// Allocate an ephemeral port on `host` and start serving on it.
    pub async fn bind_and_start_on(host: &str) -> Result<DiagnosticsHandle, PortAllocationError> {
        let listener = allocate_ephemeral_on(host).await?;
        Self::new().start(listener)
    }

    /// Spawn the serving loop on `listener` and return immediately.
    ///
    /// Routes are registered and the port is recorded before the task is
    /// spawned, so the returned port is reachable as soon as the runtime
    /// polls the task.
    pub fn start(self, listener: TcpListener) -> Result<DiagnosticsHandle, PortAllocationError> {
        let local_addr = listener.local_addr().map_err(PortAllocationError::LocalAddr)?;
        let shutdown = Shutdown::new();
        let stop = shutdown.signalled();
        let router = self.router;

        let task = tokio::spawn(async move {
            tracing::info!(address = %local_addr, "Diagnostics server starting");
            axum::serve(listener, router)
                .with_graceful_shutdown(stop)
                .await
                .map_err(FatalServeError::Serve)?;
            tracing::info!(address = %local_addr, "Diagnostics server stopped");
            Ok::<(), FatalServeError>(())
        });

        Ok(DiagnosticsHandle {
            local_addr,
            shutdown,
            task,
        })
    }
}

impl Default for DiagnosticsServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the running diagnostics server.
///
/// Dropping the handle leaves the server running for the rest of the
/// process; call [`DiagnosticsHandle::shutdown`] to stop it.
#[derive(Debug)]
pub struct DiagnosticsHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), FatalServeError>>,
}

impl DiagnosticsHandle {
    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Bound port as decimal text, the form reported back to the host.
    pub fn port(&self) -> String {
        self.local_addr.port().to_string()
    }

    /// Ask the serving loop to stop accepting and drain.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for the serving loop to exit and return its outcome.
    ///
    /// Must not be called again once it has returned.
    pub async fn wait(&mut self) -> Result<(), FatalServeError> {
        (&mut self.task).await?
    }

    /// Trigger shutdown and wait for the loop to exit.
    pub async fn stop(mut self) -> Result<(), FatalServeError> {
        self.shutdown();
        self.wait().await
    }
}
