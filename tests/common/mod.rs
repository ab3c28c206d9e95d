//! Shared utilities for integration tests.

use std::time::Duration;

use plugin_bootstrap::lifecycle::{resolve, ProcessDefaults, Startup};

/// Resolve a payload that enables diagnostics and return the startup outcome.
pub async fn start_with_pprof() -> Startup {
    resolve(Some(r#"{"Pprof": true}"#), &ProcessDefaults::default())
        .await
        .expect("startup with diagnostics")
}

/// HTTP client that bypasses proxies and connection pooling.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap()
}

/// URL of a diagnostics path on the given port.
pub fn url(port: &str, path: &str) -> String {
    format!("http://127.0.0.1:{}{}", port, path)
}

/// Keep a CPU busy for `duration` so the sampler has something to record.
#[allow(dead_code)]
pub fn burn_cpu(duration: Duration) -> std::thread::JoinHandle<u64> {
    std::thread::spawn(move || {
        let deadline = std::time::Instant::now() + duration;
        let mut acc = 0u64;
        while std::time::Instant::now() < deadline {
            for i in 0..10_000u64 {
                acc = acc.wrapping_mul(31).wrapping_add(i);
            }
        }
        acc
    })
}
