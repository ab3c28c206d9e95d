//! Startup resolution tests against the public API.

use std::time::Duration;

use plugin_bootstrap::lifecycle::{
    resolve, ProcessDefaults, StartupError, DEFAULT_PING_TIMEOUT, OS_ASSIGNED_PORT,
};
use plugin_bootstrap::net::PortAllocationError;

mod common;

#[tokio::test]
async fn test_empty_payloads_resolve_to_zero_values() {
    for payload in [None, Some(""), Some("{}")] {
        let startup = resolve(payload, &ProcessDefaults::default()).await.unwrap();
        assert!(startup.tls().is_none());
        assert_eq!(startup.defaults.listen_port, OS_ASSIGNED_PORT);
        assert_eq!(startup.defaults.diagnostics_port, OS_ASSIGNED_PORT);
        assert_eq!(startup.defaults.ping_timeout, DEFAULT_PING_TIMEOUT);
        assert!(startup.diagnostics.is_none());
    }
}

#[tokio::test]
async fn test_listen_port_is_taken_verbatim() {
    for port in ["1", "8080", "65535", "not-a-number"] {
        let payload = format!(r#"{{"ListenPort": "{}"}}"#, port);
        let startup = resolve(Some(&payload), &ProcessDefaults::default()).await.unwrap();
        assert_eq!(startup.defaults.listen_port, port);
    }
}

#[tokio::test]
async fn test_timeout_overrides_only_when_non_zero() {
    let previous = ProcessDefaults {
        ping_timeout: Duration::from_secs(4),
        ..Default::default()
    };

    let startup = resolve(Some(r#"{"PingTimeoutDuration": 10000000}"#), &previous)
        .await
        .unwrap();
    assert_eq!(startup.defaults.ping_timeout, Duration::from_millis(10));

    let startup = resolve(Some(r#"{"PingTimeoutDuration": 0}"#), &previous)
        .await
        .unwrap();
    assert_eq!(startup.defaults.ping_timeout, Duration::from_secs(4));
}

#[tokio::test]
async fn test_malformed_payloads_leave_defaults_untouched() {
    let defaults = ProcessDefaults {
        listen_port: "5000".into(),
        ..Default::default()
    };
    let snapshot = defaults.clone();

    for payload in [r#"{"ListenPort": "6000""#, r#"{"ListenPort": 6000}"#, "[1, 2"] {
        let err = resolve(Some(payload), &defaults).await.unwrap_err();
        assert!(matches!(err, StartupError::Decode(_)), "payload {}", payload);
        assert_eq!(defaults, snapshot);
    }
}

#[tokio::test]
async fn test_case_folded_and_repeated_keys() {
    let startup = resolve(
        Some(r#"{"listenPort": "8080", "ListenPort": "9090", "pingtimeoutduration": 5000000}"#),
        &ProcessDefaults::default(),
    )
    .await
    .unwrap();
    assert_eq!(startup.defaults.listen_port, "9090");
    assert_eq!(startup.defaults.ping_timeout, Duration::from_millis(5));
}

#[tokio::test]
async fn test_unbindable_diagnostics_host_fails_resolution() {
    let defaults = ProcessDefaults {
        diagnostics_host: "192.0.2.1".into(),
        ..Default::default()
    };
    let snapshot = defaults.clone();

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        resolve(Some(r#"{"Pprof": true}"#), &defaults),
    )
    .await
    .expect("resolution returned instead of hanging");

    let err = outcome.unwrap_err();
    assert!(
        matches!(err, StartupError::PortAllocation(PortAllocationError::Bind { .. })),
        "got {}",
        err
    );
    assert_eq!(defaults, snapshot);
}

#[tokio::test]
async fn test_pprof_reports_a_listening_port() {
    let startup = common::start_with_pprof().await;
    let port = startup.defaults.diagnostics_port.clone();

    assert!(!port.is_empty());
    let parsed: u16 = port.parse().expect("numeric port");
    assert_ne!(parsed, 0);

    let res = common::client()
        .get(common::url(&port, "/debug/pprof/cmdline"))
        .send()
        .await
        .expect("diagnostics unreachable");
    assert_eq!(res.status(), 200);

    startup.diagnostics.unwrap().stop().await.unwrap();
}

#[tokio::test]
async fn test_tls_settings_follow_flag() {
    let startup = resolve(
        Some(r#"{"CertPath": "c.pem", "KeyPath": "k.pem", "TLSEnabled": true}"#),
        &ProcessDefaults::default(),
    )
    .await
    .unwrap();
    let tls = startup.tls().expect("tls requested");
    assert_eq!(tls.cert_path.to_str(), Some("c.pem"));
    assert_eq!(tls.key_path.to_str(), Some("k.pem"));
}
