//! Multipart Form - multipart 请求的读取
//!
//! 文本字段进入 `Payload`，文件部分落盘为 `TempUpload`。
//! 表单随处理函数结束而释放，临时文件同时删除。

use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use std::sync::Arc;

use crate::application::ports::UploadedFile;
use crate::domain::Payload;
use crate::infrastructure::adapters::{TempUpload, UploadDir};

use super::error::ApiError;
use super::state::AppState;

/// 解析后的 multipart 表单
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: Payload,
    uploads: Vec<(String, TempUpload)>,
}

impl UploadForm {
    /// 读取所有部分
    ///
    /// 没有文件名或内容为空的文件部分被跳过。
    pub async fn read(uploads: &UploadDir, mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let Some(file_name) = field.file_name().map(str::to_string) else {
                let text = field.text().await?;
                form.fields.insert_text(name, text);
                continue;
            };

            if file_name.trim().is_empty() {
                tracing::debug!(field = %name, "Skipping file part without a filename");
                continue;
            }

            let content_type = field.content_type().map(str::to_string);
            match uploads.persist(Some(file_name), content_type, field).await? {
                Some(upload) => form.uploads.push((name, upload)),
                None => tracing::debug!(field = %name, "Skipping empty file part"),
            }
        }

        Ok(form)
    }

    /// 指定字段下的所有文件，按上传顺序
    pub fn files(&self, name: &str) -> Vec<UploadedFile> {
        self.uploads
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, upload)| upload.file().clone())
            .collect()
    }

    /// 指定字段下的第一个文件
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.uploads
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, upload)| upload.file())
    }
}

#[async_trait]
impl FromRequest<Arc<AppState>> for UploadForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Self::read(&state.uploads, multipart).await
    }
}
