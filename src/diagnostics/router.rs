//! Diagnostics route table.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::diagnostics::handlers::{cmdline, index, profile, symbol, trace};

/// Paths served by [`index`].
pub const INDEX_ROUTES: &[&str] = &[
    "/debug/pprof/",
    "/debug/pprof/block",
    "/debug/pprof/goroutine",
    "/debug/pprof/heap",
    "/debug/pprof/threadcreate",
];

/// Build the diagnostics router.
///
/// GET only, no authentication: the endpoint is meant for the host or a
/// local operator.
pub fn build_router() -> Router {
    let mut router = Router::new();
    for path in INDEX_ROUTES {
        router = router.route(path, get(index));
    }

    router
        .route("/debug/pprof/cmdline", get(cmdline))
        .route("/debug/pprof/profile", get(profile))
        .route("/debug/pprof/symbol", get(symbol))
        .route("/debug/pprof/trace", get(trace))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    async fn get_status(path: &str) -> StatusCode {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        build_router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn index_variants_share_the_index_page() {
        for path in INDEX_ROUTES {
            assert_eq!(get_status(path).await, StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn cmdline_and_symbol_are_routed() {
        assert_eq!(get_status("/debug/pprof/cmdline").await, StatusCode::OK);
        assert_eq!(get_status("/debug/pprof/symbol").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        assert_eq!(get_status("/debug/pprof/allocs").await, StatusCode::NOT_FOUND);
        assert_eq!(get_status("/debug/vars").await, StatusCode::NOT_FOUND);
        assert_eq!(get_status("/").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn only_get_is_allowed() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/debug/pprof/symbol")
            .body(Body::empty())
            .unwrap();
        let response = build_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
