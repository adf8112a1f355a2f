//! Auth HTTP Handlers - 注册、登录与验证码
//!
//! 注册与登录响应会回传上游的 Authorization 头，并在响应体中补充 `token`。

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::application::ports::MemoryReply;
use crate::domain::{
    attach_token, extract_access_token, find_authorization, mask_token,
    SendValidationCodeRequest, SignInEmailRequest, SignInMobileRequest, SignUpRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{AccessToken, JsonPayload};
use crate::infrastructure::http::state::AppState;

/// 注册
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    JsonPayload(payload): JsonPayload,
) -> Result<Response, ApiError> {
    let request = SignUpRequest::from_payload(&payload)?;
    let client = state.memory_client(token.as_deref()).await?;
    let reply = client.sign_up(&request).await?;
    Ok(auth_response(reply, "sign-up"))
}

/// 邮箱登录
pub async fn sign_in_with_email(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    JsonPayload(payload): JsonPayload,
) -> Result<Response, ApiError> {
    let request = SignInEmailRequest::from_payload(&payload)?;
    let client = state.memory_client(token.as_deref()).await?;
    let reply = client.sign_in_with_email(&request).await?;
    Ok(auth_response(reply, "sign-in-email"))
}

/// 手机号登录
pub async fn sign_in_with_mobile(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    JsonPayload(payload): JsonPayload,
) -> Result<Response, ApiError> {
    let request = SignInMobileRequest::from_payload(&payload)?;
    let client = state.memory_client(token.as_deref()).await?;
    let reply = client.sign_in_with_mobile(&request).await?;
    Ok(auth_response(reply, "sign-in-mobile"))
}

/// 发送验证码
pub async fn send_validation_code(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<Value>, ApiError> {
    let request = SendValidationCodeRequest::from_payload(&payload)?;
    let client = state.memory_client(token.as_deref()).await?;
    let reply = client.send_validation_code(&request).await?;
    Ok(Json(reply.body))
}

/// 以上游状态码返回，回传 Authorization 头并补充 `token`
fn auth_response(reply: MemoryReply, flow: &'static str) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
    let authorization = find_authorization(&reply.headers);
    let body = attach_token(reply.body, authorization.as_deref());

    let masked = mask_token(extract_access_token(authorization.as_deref()).as_deref());
    tracing::info!(
        flow = flow,
        status = status.as_u16(),
        token = masked.as_deref().unwrap_or("-"),
        "Auth request completed"
    );

    let mut response = (status, Json(body)).into_response();
    if let Some(value) = authorization.and_then(|v| HeaderValue::from_str(&v).ok()) {
        response.headers_mut().insert(AUTHORIZATION, value);
    }
    response
}
