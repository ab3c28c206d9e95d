//! TLS settings requested by the host.
//!
//! The bootstrap layer never terminates TLS itself. It turns the host's
//! `CertPath`/`KeyPath`/`TLSEnabled` fields into a typed setting for the
//! plugin's RPC server, which owns loading the material.

use std::path::PathBuf;

use crate::config::StartupArgs;

/// Certificate and key paths requested by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl TlsSettings {
    /// Extract TLS settings from startup arguments.
    ///
    /// Returns `None` unless the host set `TLSEnabled`.
    pub fn from_args(args: &StartupArgs) -> Option<Self> {
        if !args.tls_enabled {
            return None;
        }
        Some(Self {
            cert_path: PathBuf::from(&args.cert_path),
            key_path: PathBuf::from(&args.key_path),
        })
    }
}
