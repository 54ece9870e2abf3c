pub mod api;
pub mod state;
pub mod utils;

use axum::{http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use self::api::contents;
use self::state::AppState;
use self::utils::errors::not_found_json;

/// 内容服务路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/contents", get(contents::root_handler))
        .route("/api/contents/*path", get(contents::handler))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(not_found_json("No such route")),
            )
        })
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
