//! Conversations HTTP Handlers - 最近事件、会话与线程

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{ConversationsQuery, RecentEventsQuery, ThreadsQuery};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{AccessToken, QueryPayload};
use crate::infrastructure::http::state::AppState;

/// 最近事件
pub async fn recent_events(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    QueryPayload(payload): QueryPayload,
) -> Result<Json<Value>, ApiError> {
    let query = RecentEventsQuery::from_payload(&payload)?;
    let client = state.memory_client(token.as_deref()).await?;
    let reply = client.recent_events(&query).await?;
    Ok(Json(reply.body))
}

/// 会话列表，参数均可选
pub async fn conversations(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    QueryPayload(payload): QueryPayload,
) -> Result<Json<Value>, ApiError> {
    let query = ConversationsQuery::from_payload(&payload);
    let client = state.memory_client(token.as_deref()).await?;
    let reply = client.conversations(&query).await?;
    Ok(Json(reply.body))
}

/// 会话线程
pub async fn conversation_threads(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    QueryPayload(payload): QueryPayload,
) -> Result<Json<Value>, ApiError> {
    let query = ThreadsQuery::from_payload(&payload)?;
    let client = state.memory_client(token.as_deref()).await?;
    let reply = client.conversation_threads(&query).await?;
    Ok(Json(reply.body))
}
