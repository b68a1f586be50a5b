//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static game frontend from `./static` with index fallback
/// - CORS (allow any origin/method/headers); tighten for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/level", get(http::http_get_level))
        .route("/api/v1/level/:id", get(http::http_get_level_by_id))
        .route("/api/v1/check", post(http::http_post_check))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::GameConfig;

    fn app() -> Router {
        let state = AppState::with_config(GameConfig { seed: Some(31), ..GameConfig::default() });
        build_router(Arc::new(state))
    }

    async fn json_body(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_is_ok() {
        let resp = app()
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["ok"], true);
    }

    #[tokio::test]
    async fn level_then_check_round_trip() {
        let app = app();
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/level?difficulty=8&mode=fullmatch")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let level = json_body(resp).await;
        assert_eq!(level["difficulty"], 8);
        assert_eq!(level["mode"], "fullmatch");
        let regex = level["regex"].as_str().expect("regex");
        assert!(regex.starts_with('^') && regex.ends_with('$'));

        let candidates = level["candidates"].as_array().expect("candidates");
        let first = &candidates[0];
        let body = serde_json::json!({ "levelId": level["id"], "text": first["text"] }).to_string();
        let id = level["id"].as_str().expect("id");
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(format!("/api/v1/level/{}", id)).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["regex"], regex);

        let resp = app
            .clone()
            .oneshot(Request::builder().uri("/api/v1/level/nope").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/check")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        let check = json_body(resp).await;
        assert_eq!(check["known"], true);
        assert_eq!(check["isMatch"], first["isMatch"]);
    }

    #[tokio::test]
    async fn unknown_mode_is_a_bad_request() {
        let resp = app()
            .oneshot(Request::builder().uri("/api/v1/level?mode=glob").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
