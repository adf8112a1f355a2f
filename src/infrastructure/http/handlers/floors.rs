//! Floors HTTP Handlers - floor 信息查询与编辑

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{EditFloorRequest, FloorQuery};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{AccessToken, QueryPayload};
use crate::infrastructure::http::form::UploadForm;
use crate::infrastructure::http::state::AppState;

const LOGO_FIELD: &str = "logo_file";

/// 获取 floor 信息
pub async fn floor_information(
    State(state): State<Arc<AppState>>,
    Path(floor_id): Path<String>,
    token: AccessToken,
    QueryPayload(payload): QueryPayload,
) -> Result<Json<Value>, ApiError> {
    let query = FloorQuery::from_payload(&floor_id, &payload)?;
    let client = state.memory_client(token.as_deref()).await?;

    match client.floor_information(&query).await {
        Ok(reply) => Ok(Json(reply.body)),
        Err(e) => {
            tracing::warn!(
                floor_id = %query.floor_id,
                app_id = %query.app_id,
                user_id = query.user_id.as_deref().unwrap_or("-"),
                token = %token.masked(),
                error = %e,
                "Floor information request failed"
            );
            Err(e.into())
        }
    }
}

/// 编辑 floor
pub async fn edit_floor(
    State(state): State<Arc<AppState>>,
    Path(floor_id): Path<String>,
    token: AccessToken,
    form: UploadForm,
) -> Result<Json<Value>, ApiError> {
    let request = EditFloorRequest::from_payload(&floor_id, &form.fields)?;
    let logo = form.file(LOGO_FIELD);
    let client = state.memory_client(token.as_deref()).await?;

    match client.edit_floor(&request, logo).await {
        Ok(reply) => Ok(Json(reply.body)),
        Err(e) => {
            tracing::warn!(
                floor_id = %request.floor_id,
                app_id = %request.app_id,
                user_id = %request.user_id,
                has_logo = logo.is_some(),
                token = %token.masked(),
                error = %e,
                "Edit floor request failed"
            );
            Err(e.into())
        }
    }
}
