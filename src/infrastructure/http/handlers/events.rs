//! Events HTTP Handler - 创建记忆事件
//!
//! multipart 请求：`input_info`、`app_id` 文本字段，零到多个 `files` 文件。

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::EventRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::AccessToken;
use crate::infrastructure::http::form::UploadForm;
use crate::infrastructure::http::state::AppState;

const FILES_FIELD: &str = "files";

/// 创建事件
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    form: UploadForm,
) -> Result<Json<Value>, ApiError> {
    let request = EventRequest::from_payload(&form.fields)?;
    let files = form.files(FILES_FIELD);
    let client = state.memory_client(token.as_deref()).await?;

    tracing::debug!(
        app_id = %request.app_id,
        files = files.len(),
        "Creating memory event"
    );

    let reply = match files.as_slice() {
        [] => client.create_event(&request, None).await?,
        [file] => client.create_event(&request, Some(file)).await?,
        _ => client.create_event_with_files(&request, &files).await?,
    };

    Ok(Json(reply.body))
}
