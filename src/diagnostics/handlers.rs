//! Diagnostic request handlers.
//!
//! Each handler is stateless. Profiling captures run on the blocking pool
//! because the sampler holds the process-wide profiler for the whole window.

use std::collections::HashMap;
use std::ffi::c_void;
use std::time::Duration;

use axum::{
    extract::{Query, RawQuery},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use pprof::protos::Message;

/// Default window for `/debug/pprof/profile`.
pub const DEFAULT_PROFILE_WINDOW: Duration = Duration::from_secs(30);

/// Default window for `/debug/pprof/trace`.
pub const DEFAULT_TRACE_WINDOW: Duration = Duration::from_secs(1);

/// Longest window either capture route accepts; larger requests are clamped.
pub const MAX_CAPTURE_WINDOW: Duration = Duration::from_secs(300);

/// Sampling frequency in Hz.
const SAMPLE_FREQUENCY: i32 = 100;

/// Profiles listed on the index page, with their descriptions.
const PROFILES: &[(&str, &str)] = &[
    ("cmdline", "The command line invocation of the current program."),
    ("profile", "CPU profile. Use the `seconds` parameter to set the duration."),
    ("symbol", "Maps `+`-separated hex addresses in the query to symbol names."),
    ("trace", "Execution samples rendered as a flamegraph. Use `seconds` to set the duration."),
];

/// General index of available profiles.
///
/// The `block`, `goroutine`, `heap` and `threadcreate` routes land here as well.
pub async fn index() -> Html<String> {
    let mut page = String::from(
        "<html>\n<head><title>/debug/pprof/</title></head>\n<body>\n/debug/pprof/<br>\n<br>\nTypes of profiles available:\n<dl>\n",
    );
    for (name, description) in PROFILES {
        page.push_str(&format!(
            "<dt><a href=\"{name}\">{name}</a></dt><dd>{description}</dd>\n"
        ));
    }
    page.push_str("</dl>\n</body>\n</html>\n");
    Html(page)
}

/// Command line of the running process, arguments separated by NUL.
pub async fn cmdline() -> impl IntoResponse {
    let body = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("\0");

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        body,
    )
}

/// CPU profile in pprof protobuf format.
pub async fn profile(Query(params): Query<HashMap<String, String>>) -> Response {
    let window = profile_window(params.get("seconds"));
    tracing::info!(seconds = window.as_secs_f64(), "Capturing CPU profile");

    match run_capture(window, encode_protobuf).await {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "application/octet-stream"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"profile\""),
            ],
            body,
        )
            .into_response(),
        Err(message) => capture_failed(message),
    }
}

/// Execution samples over a short window, rendered as a flamegraph.
pub async fn trace(Query(params): Query<HashMap<String, String>>) -> Response {
    let window = trace_window(params.get("seconds"));
    tracing::info!(seconds = window.as_secs_f64(), "Capturing execution trace");

    match run_capture(window, render_flamegraph).await {
        Ok(body) => ([(header::CONTENT_TYPE, "image/svg+xml")], body).into_response(),
        Err(message) => capture_failed(message),
    }
}

/// Symbol lookup for the addresses in the raw query string.
pub async fn symbol(RawQuery(query): RawQuery) -> impl IntoResponse {
    let mut body = String::from("num_symbols: 1\n");

    for word in query.as_deref().unwrap_or_default().split('+') {
        let Some(addr) = parse_address(word) else {
            continue;
        };
        if let Some(name) = lookup_symbol(addr) {
            body.push_str(&format!("{addr:#x} {name}\n"));
        }
    }

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

/// Profile window in whole seconds.
///
/// Missing, fractional, malformed and non-positive values fall back to
/// [`DEFAULT_PROFILE_WINDOW`].
fn profile_window(raw: Option<&String>) -> Duration {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_PROFILE_WINDOW)
        .min(MAX_CAPTURE_WINDOW)
}

/// Trace window in (possibly fractional) seconds.
///
/// Missing, malformed, non-finite and non-positive values fall back to
/// [`DEFAULT_TRACE_WINDOW`].
fn trace_window(raw: Option<&String>) -> Duration {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(DEFAULT_TRACE_WINDOW)
        .min(MAX_CAPTURE_WINDOW)
}

/// Parse `0x`-prefixed hex or plain decimal. Zero counts as invalid.
fn parse_address(word: &str) -> Option<usize> {
    let word = word.trim();
    let parsed = match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => word.parse::<usize>().ok(),
    };
    parsed.filter(|addr| *addr != 0)
}

/// Name of the function containing `addr`.
fn lookup_symbol(addr: usize) -> Option<String> {
    let mut name = None;
    // `resolve` takes a return address and looks up the byte before it.
    let return_addr = addr.wrapping_add(1) as *mut c_void;
    backtrace::resolve(return_addr, |sym| {
        if name.is_none() {
            name = sym.name().map(|n| n.to_string());
        }
    });
    name
}

async fn run_capture(
    window: Duration,
    render: fn(&pprof::Report) -> Result<Vec<u8>, String>,
) -> Result<Vec<u8>, String> {
    tokio::task::spawn_blocking(move || sample(window, render))
        .await
        .map_err(|e| format!("capture task failed: {e}"))?
}

fn sample(
    window: Duration,
    render: fn(&pprof::Report) -> Result<Vec<u8>, String>,
) -> Result<Vec<u8>, String> {
    let guard = pprof::ProfilerGuard::new(SAMPLE_FREQUENCY)
        .map_err(|e| format!("could not start profiler: {e}"))?;
    std::thread::sleep(window);
    let report = guard
        .report()
        .build()
        .map_err(|e| format!("could not build report: {e}"))?;
    render(&report)
}

fn encode_protobuf(report: &pprof::Report) -> Result<Vec<u8>, String> {
    let profile = report.pprof().map_err(|e| e.to_string())?;
    let mut body = Vec::new();
    profile.encode(&mut body).map_err(|e| e.to_string())?;
    Ok(body)
}

fn render_flamegraph(report: &pprof::Report) -> Result<Vec<u8>, String> {
    let mut body = Vec::new();
    report.flamegraph(&mut body).map_err(|e| e.to_string())?;
    Ok(body)
}

fn capture_failed(message: String) -> Response {
    tracing::warn!(error = %message, "Profile capture failed");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
