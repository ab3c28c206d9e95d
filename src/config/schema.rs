//! Startup argument schema.
//!
//! Field names follow the host's wire format (`LogLevel`, `ListenPort`, ...),
//! so every field carries an explicit serde rename.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Arguments passed by the host when it launches the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StartupArgs {
    /// Plugin log level, logrus numbering (0 = panic .. 6 = trace).
    #[serde(rename = "LogLevel")]
    pub log_level: u8,

    /// Liveness-check timeout. Zero means "keep the process default".
    #[serde(rename = "PingTimeoutDuration", with = "nanos")]
    pub ping_timeout: Duration,

    /// Requested listen port. Empty lets the OS choose.
    #[serde(rename = "ListenPort")]
    pub listen_port: String,

    /// Enable the diagnostics endpoint.
    #[serde(rename = "Pprof")]
    pub pprof: bool,

    /// Path to TLS certificate file for a TLS server.
    #[serde(rename = "CertPath")]
    pub cert_path: String,

    /// Path to TLS private key file for a TLS server.
    #[serde(rename = "KeyPath")]
    pub key_path: String,

    /// Host requests a TLS channel.
    #[serde(rename = "TLSEnabled")]
    pub tls_enabled: bool,
}

impl StartupArgs {
    /// Wire names of every field, as the host spells them.
    pub const FIELD_NAMES: &'static [&'static str] = &[
        "LogLevel",
        "PingTimeoutDuration",
        "ListenPort",
        "Pprof",
        "CertPath",
        "KeyPath",
        "TLSEnabled",
    ];
}

/// Durations travel as integer nanoseconds.
mod nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(value.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
