//! Plugin bootstrap entry point.
//!
//! ```text
//! host ──argv[1] JSON──▶ decode ──▶ logging ──▶ apply defaults
//!                                                   │
//!                                     [Pprof] ──────┴──▶ diagnostics server (background)
//!                                                   │
//!                                     wait for SIGTERM/SIGINT or a fatal serve error
//! ```

use clap::Parser;

use plugin_bootstrap::config::decode_payload;
use plugin_bootstrap::lifecycle::{self, signals, FailFast, ProcessDefaults, DEFAULT_LOG_LEVEL};
use plugin_bootstrap::observability::logging;

#[derive(Parser)]
#[command(name = "plugin-bootstrap")]
#[command(about = "Bootstrap a host-managed plugin process", long_about = None)]
struct Cli {
    /// JSON startup payload supplied by the host. Empty means all defaults.
    payload: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let decoded = decode_payload(cli.payload.as_deref());
    logging::init(
        decoded
            .as_ref()
            .map(|args| args.log_level)
            .unwrap_or(DEFAULT_LOG_LEVEL),
    );

    let args = decoded.inspect_err(|err| {
        tracing::error!(error = %err, "Rejecting startup payload");
    })?;

    let mut startup = lifecycle::apply(args, &ProcessDefaults::default())
        .await
        .inspect_err(|err| tracing::error!(error = %err, "Startup failed"))?;

    tracing::info!(
        listen_port = %startup.defaults.listen_port,
        diagnostics_port = %startup.defaults.diagnostics_port,
        ping_timeout_ms = startup.defaults.ping_timeout.as_millis() as u64,
        "Plugin bootstrap complete"
    );

    if let Some(tls) = startup.tls() {
        tracing::info!(
            cert = ?tls.cert_path,
            key = ?tls.key_path,
            "TLS requested for the RPC channel"
        );
    }

    let policy = FailFast::default();
    match startup.diagnostics.as_mut() {
        Some(handle) => {
            tokio::select! {
                outcome = handle.wait() => policy.enforce(outcome),
                _ = signals::wait_for_termination() => {
                    handle.shutdown();
                    policy.enforce(handle.wait().await);
                }
            }
        }
        None => signals::wait_for_termination().await,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
