use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::error::{ContentsError, HostError};

pub const CODE_INTERNAL: &str = "RCM-CORE-500";
pub const CODE_BAD_REQUEST: &str = "RCM-CORE-400";
pub const CODE_NOT_FOUND: &str = "RCM-CORE-404";
pub const CODE_FORBIDDEN: &str = "RCM-CORE-403";

pub const CODE_SIZE_UNKNOWN: &str = "RCM-SIZE-500";
pub const CODE_CONFIG: &str = "RCM-CONF-500";

pub fn internal_error_json(details: &str) -> Value {
    error_json(CODE_INTERNAL, "Internal error", Some(details))
}

pub fn bad_request_json(details: &str) -> Value {
    error_json(CODE_BAD_REQUEST, "Invalid request", Some(details))
}

pub fn not_found_json(details: &str) -> Value {
    error_json(CODE_NOT_FOUND, "Not found", Some(details))
}

pub fn error_json(code: &str, safe_message: &str, details: Option<&str>) -> Value {
    let message = if cfg!(debug_assertions) {
        details.unwrap_or(safe_message)
    } else {
        safe_message
    };
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// 策略错误对应的 HTTP 状态码、错误码及 release 构建下的提示信息
pub fn classify(err: &ContentsError) -> (StatusCode, &'static str, &'static str) {
    match err {
        ContentsError::SizeUnknown { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_SIZE_UNKNOWN,
            "File size unknown",
        ),
        ContentsError::Host(host) => match host {
            HostError::NotFound(_) | HostError::OutsideRoot(_) => {
                (StatusCode::NOT_FOUND, CODE_NOT_FOUND, "Not found")
            }
            HostError::PermissionDenied(_) => {
                (StatusCode::FORBIDDEN, CODE_FORBIDDEN, "Permission denied")
            }
            HostError::NotUtf8(_) => (
                StatusCode::BAD_REQUEST,
                CODE_BAD_REQUEST,
                "File is not UTF-8 encoded",
            ),
            HostError::NotAFile(_) => (StatusCode::BAD_REQUEST, CODE_BAD_REQUEST, "Not a file"),
            HostError::Io { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                CODE_INTERNAL,
                "Internal error",
            ),
        },
        ContentsError::UnrecognizedFormat(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_CONFIG,
            "Content format not supported",
        ),
        ContentsError::Descriptor(_) | ContentsError::Summary { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_INTERNAL,
            "Internal error",
        ),
    }
}

pub fn contents_error_response(err: &ContentsError) -> Response {
    let (status, code, safe_message) = classify(err);
    if status.is_server_error() {
        tracing::error!("[Contents] Request failed: {}", err);
    } else {
        tracing::debug!("[Contents] Request rejected: {}", err);
    }
    let details = err.to_string();
    (status, Json(error_json(code, safe_message, Some(&details)))).into_response()
}
