//! Fail-fast policy for the diagnostics serving loop.
//!
//! A broken diagnostics channel invalidates the whole plugin instance, so
//! the caller that owns the handle applies one of these policies to the
//! loop's outcome.

use crate::diagnostics::FatalServeError;

/// Exit status used by [`FailFast::Exit`] by default (`EX_SOFTWARE`).
pub const FATAL_SERVE_EXIT_CODE: i32 = 70;

/// What to do when the diagnostics loop fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailFast {
    /// Abort the process immediately.
    Abort,
    /// Exit the process with the given status.
    Exit(i32),
}

impl Default for FailFast {
    fn default() -> Self {
        FailFast::Exit(FATAL_SERVE_EXIT_CODE)
    }
}

impl FailFast {
    /// Apply the policy to the loop's outcome.
    ///
    /// Returns normally only when the loop stopped cleanly.
    pub fn enforce(self, outcome: Result<(), FatalServeError>) {
        let Err(err) = outcome else {
            tracing::info!("Diagnostics server exited cleanly");
            return;
        };

        tracing::error!(error = %err, policy = ?self, "Diagnostics server failed, terminating plugin");
        match self {
            FailFast::Abort => std::process::abort(),
            FailFast::Exit(code) => std::process::exit(code),
        }
    }
}
