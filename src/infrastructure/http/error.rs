//! HTTP Error Handling - 统一错误信封
//!
//! 所有错误以 `{"error": {"message": ..., "details": ...}}` 返回。
//! 上游错误体已包含 `error` 时原样透传。

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use crate::application::ports::{is_certificate_failure, MemoryApiError};
use crate::domain::{non_blank_text, FieldError};
use crate::infrastructure::adapters::UploadError;

/// 错误消息定义
pub mod message {
    pub const INVALID_PAYLOAD: &str = "Invalid request payload.";
    pub const UPSTREAM_FAILED: &str = "Memory API request failed";
    pub const TLS_TRUST: &str = "TLS certificate verification failed while calling the memory API. \
        Set memory_api.ssl_ca_cert (env FLOORGATE_MEMORY_API__SSL_CA_CERT) to a PEM bundle \
        that trusts the upstream certificate.";
    pub const UNEXPECTED: &str = "Unexpected server error.";
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 缺失或格式错误的请求字段
    InvalidPayload(String),
    /// 上游返回的非 2xx 响应
    Upstream { status: u16, body: Option<String> },
    /// 上游证书无法校验
    TlsTrust(String),
    /// 上游不可达（连接、超时、DNS）
    BadGateway(String),
    Unexpected(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "InvalidPayload",
            ApiError::Upstream { .. } => "Upstream",
            ApiError::TlsTrust(_) => "TlsTrust",
            ApiError::BadGateway(_) => "BadGateway",
            ApiError::Unexpected(_) => "Unexpected",
        }
    }

    /// 原始错误文本为空时使用错误类型名
    fn details(&self, text: &str) -> Value {
        if text.trim().is_empty() {
            Value::String(self.kind().to_string())
        } else {
            Value::String(text.to_string())
        }
    }

    /// 渲染状态码与响应体
    pub fn to_status_and_body(&self) -> (StatusCode, Value) {
        match self {
            ApiError::InvalidPayload(text) => (
                StatusCode::BAD_REQUEST,
                error_body(message::INVALID_PAYLOAD, Some(self.details(text))),
            ),
            ApiError::Upstream { status, body } => upstream_error(*status, body.as_deref()),
            ApiError::TlsTrust(text) => (
                StatusCode::BAD_GATEWAY,
                error_body(message::TLS_TRUST, Some(self.details(text))),
            ),
            ApiError::BadGateway(text) => (
                StatusCode::BAD_GATEWAY,
                error_body(message::UPSTREAM_FAILED, Some(self.details(text))),
            ),
            ApiError::Unexpected(text) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body(message::UNEXPECTED, Some(self.details(text))),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidPayload(text) => {
                tracing::warn!(error = %text, "Invalid request payload");
            }
            ApiError::Upstream { status, .. } => {
                tracing::warn!(status = *status, "Memory API returned error");
            }
            ApiError::TlsTrust(text) => {
                tracing::error!(error = %text, "Memory API TLS verification failed");
            }
            ApiError::BadGateway(text) => {
                tracing::error!(error = %text, "Memory API unreachable");
            }
            ApiError::Unexpected(text) => {
                tracing::error!(error = %text, "Unexpected server error");
            }
        }

        let (status, body) = self.to_status_and_body();
        (status, Json(body)).into_response()
    }
}

/// 构造错误信封
pub fn error_body(message: &str, details: Option<Value>) -> Value {
    let mut error = Map::new();
    error.insert("message".to_string(), Value::String(message.to_string()));
    if let Some(details) = details {
        error.insert("details".to_string(), details);
    }
    json!({ "error": error })
}

/// 将上游错误响应规范化为错误信封
///
/// 状态码无效时使用 502。
pub fn upstream_error(status: u16, body: Option<&str>) -> (StatusCode, Value) {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);

    let raw = body.unwrap_or_default();
    let parsed = serde_json::from_str::<Value>(raw).ok();

    let body = match parsed {
        Some(Value::Object(map)) if map.contains_key("error") => Value::Object(map),
        Some(structured @ (Value::Object(_) | Value::Array(_))) => {
            error_body(&upstream_message(&structured), Some(structured))
        }
        _ => {
            let details = (!raw.trim().is_empty()).then(|| Value::String(raw.to_string()));
            error_body(message::UPSTREAM_FAILED, details)
        }
    };

    (status, body)
}

/// 依次取 `error.message`、`message`、`detail`
fn upstream_message(body: &Value) -> String {
    body.get("error")
        .and_then(|error| error.get("message"))
        .and_then(non_blank_text)
        .or_else(|| body.get("message").and_then(non_blank_text))
        .or_else(|| body.get("detail").and_then(non_blank_text))
        .unwrap_or_else(|| message::UPSTREAM_FAILED.to_string())
}

// ============================================================================
// Conversions
// ============================================================================

impl From<FieldError> for ApiError {
    fn from(e: FieldError) -> Self {
        ApiError::InvalidPayload(e.to_string())
    }
}

impl From<MemoryApiError> for ApiError {
    fn from(e: MemoryApiError) -> Self {
        match e {
            MemoryApiError::Status { status, body } => ApiError::Upstream { status, body },
            MemoryApiError::Tls(text) => ApiError::TlsTrust(text),
            MemoryApiError::Transport(text) if is_certificate_failure(&text) => {
                ApiError::TlsTrust(text)
            }
            MemoryApiError::Transport(text) => ApiError::BadGateway(text),
            MemoryApiError::InvalidToken(text) => ApiError::InvalidPayload(text),
            MemoryApiError::Io(text) if is_certificate_failure(&text) => ApiError::TlsTrust(text),
            e @ (MemoryApiError::Io(_) | MemoryApiError::Config(_)) => {
                ApiError::Unexpected(e.to_string())
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Read(_) => ApiError::InvalidPayload(e.to_string()),
            UploadError::Io(_) => ApiError::Unexpected(e.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::InvalidPayload(e.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ApiError::InvalidPayload(e.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::InvalidPayload(e.body_text())
    }
}
