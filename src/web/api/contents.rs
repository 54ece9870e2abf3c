use crate::contents::ContentFormat;
use crate::web::state::AppState;
use crate::web::utils::errors::{bad_request_json, contents_error_response, internal_error_json};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ContentsQuery {
    /// `0` 仅返回元数据，`1`（默认）附带内容
    pub content: Option<String>,
    /// `text` 或 `base64`
    pub format: Option<String>,
}

/// 获取根目录模型
pub async fn root_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContentsQuery>,
) -> Response {
    fetch(state, String::new(), query).await
}

/// 获取根目录下文件或目录的模型
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(query): Query<ContentsQuery>,
) -> Response {
    fetch(state, path, query).await
}

async fn fetch(state: Arc<AppState>, path: String, query: ContentsQuery) -> Response {
    let want_content = match query.content.as_deref() {
        None | Some("1") => true,
        Some("0") => false,
        Some(other) => {
            let details = format!("Content {:?} is invalid", other);
            return (StatusCode::BAD_REQUEST, Json(bad_request_json(&details))).into_response();
        }
    };

    let format = match query.format.as_deref().map(str::parse::<ContentFormat>) {
        None => None,
        Some(Ok(format)) => Some(format),
        Some(Err(err)) => {
            let details = err.to_string();
            return (StatusCode::BAD_REQUEST, Json(bad_request_json(&details))).into_response();
        }
    };

    // stat 与读取均为阻塞操作，放到阻塞线程池执行
    let manager = state.manager.clone();
    let result =
        tokio::task::spawn_blocking(move || manager.get(&path, want_content, format)).await;

    match result {
        Ok(Ok(model)) => Json(model).into_response(),
        Ok(Err(err)) => contents_error_response(&err),
        Err(join_err) => {
            tracing::error!("[Contents] Worker task failed: {}", join_err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(internal_error_json(&join_err.to_string())),
            )
                .into_response()
        }
    }
}
