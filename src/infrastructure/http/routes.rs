//! HTTP Routes
//!
//! API Endpoints:
//! - /health                              GET   健康检查
//! - /memory/query                        POST  查询记忆（JSON）
//! - /memory/events                       POST  创建事件（multipart）
//! - /memory/recent-events                GET   最近事件
//! - /memory/floors/:floor_id             GET   floor 信息
//! - /memory/floors/:floor_id/edit        POST  编辑 floor（multipart）
//! - /memory/conversations                GET   会话列表
//! - /memory/threads                      GET   会话线程
//! - /memory/auth/sign-up                 POST  注册
//! - /memory/auth/sign-in/email           POST  邮箱登录
//! - /memory/auth/sign-in/mobile          POST  手机号登录
//! - /memory/auth/send-validation-code    POST  发送验证码

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/memory", memory_routes())
}

/// Memory 路由
fn memory_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/query", post(handlers::query_memory))
        .route("/events", post(handlers::create_event))
        .route("/recent-events", get(handlers::recent_events))
        .route("/floors/:floor_id", get(handlers::floor_information))
        .route("/floors/:floor_id/edit", post(handlers::edit_floor))
        .route("/conversations", get(handlers::conversations))
        .route("/threads", get(handlers::conversation_threads))
        .nest("/auth", auth_routes())
}

/// Auth 路由
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sign-up", post(handlers::sign_up))
        .route("/sign-in/email", post(handlers::sign_in_with_email))
        .route("/sign-in/mobile", post(handlers::sign_in_with_mobile))
        .route("/send-validation-code", post(handlers::send_validation_code))
}
