//! Temp Uploads - multipart 上传文件的临时落盘
//!
//! 每个文件部分流式写入上传目录下的唯一临时文件，由 `TempUpload`
//! 持有；守卫离开作用域时删除文件。删除失败只记录日志，残留文件
//! 在下次启动时由 `sweep_orphans` 清理。

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::UploadedFile;

/// 临时文件名前缀，启动清理只删除带此前缀的文件
pub const UPLOAD_PREFIX: &str = "floor-upload-";

const FALLBACK_SUFFIX: &str = ".tmp";
const MAX_SUFFIX_LEN: usize = 12;

/// 上传处理错误
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read upload: {0}")]
    Read(String),

    #[error("Failed to write temp file: {0}")]
    Io(#[from] std::io::Error),
}

/// 由原文件名推导临时文件后缀（含点号）
///
/// 后缀按字符计长；含路径分隔符时改用 `.tmp`。
pub fn file_suffix(file_name: Option<&str>) -> &str {
    let Some(name) = file_name else {
        return FALLBACK_SUFFIX;
    };

    match name.rfind('.') {
        Some(index) if index + 1 < name.len() => {
            let suffix = &name[index..];
            let has_separator = suffix.contains(['/', '\\']);
            if !has_separator && suffix.chars().count() <= MAX_SUFFIX_LEN {
                suffix
            } else {
                FALLBACK_SUFFIX
            }
        }
        _ => FALLBACK_SUFFIX,
    }
}

/// 上传目录
#[derive(Debug, Clone)]
pub struct UploadDir {
    dir: PathBuf,
}

impl UploadDir {
    /// 创建目录并清理上次运行残留的临时文件
    pub async fn prepare(dir: impl AsRef<Path>) -> Result<Self, UploadError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;

        let uploads = Self { dir };
        let removed = uploads.sweep_orphans().await?;
        if removed > 0 {
            tracing::info!(
                dir = %uploads.dir.display(),
                removed = removed,
                "Removed orphaned upload files"
            );
        }

        Ok(uploads)
    }

    /// 删除目录中所有带上传前缀的文件
    pub async fn sweep_orphans(&self) -> Result<usize, UploadError> {
        let mut removed = 0;
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let is_upload = entry
                .file_name()
                .to_str()
                .map_or(false, |name| name.starts_with(UPLOAD_PREFIX));
            if !is_upload || !entry.file_type().await?.is_file() {
                continue;
            }

            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "Failed to remove orphaned upload"
                ),
            }
        }

        Ok(removed)
    }

    /// 将一个文件部分写入临时文件
    ///
    /// 内容为空时返回 `None`，不产生临时文件。
    pub async fn persist<S, E>(
        &self,
        file_name: Option<String>,
        content_type: Option<String>,
        stream: S,
    ) -> Result<Option<TempUpload>, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let original = file_name.filter(|name| !name.trim().is_empty());
        let suffix = file_suffix(original.as_deref());

        let named = tempfile::Builder::new()
            .prefix(UPLOAD_PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.dir)?;
        let (file, temp_path) = named.into_parts();
        let mut file = fs::File::from_std(file);

        let mut stream = std::pin::pin!(stream);
        let mut size: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| UploadError::Read(e.to_string()))?;
            file.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        if size == 0 {
            return Ok(None);
        }

        let file_name = original.unwrap_or_else(|| {
            temp_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string()
        });

        tracing::debug!(
            path = %temp_path.display(),
            file_name = %file_name,
            size = size,
            "Upload stored in temp file"
        );

        Ok(Some(TempUpload {
            file: UploadedFile {
                path: temp_path.to_path_buf(),
                file_name,
                content_type,
                size,
            },
            path: Some(temp_path),
        }))
    }
}

/// 请求期间独占的临时上传文件
#[derive(Debug)]
pub struct TempUpload {
    file: UploadedFile,
    path: Option<TempPath>,
}

impl TempUpload {
    pub fn file(&self) -> &UploadedFile {
        &self.file
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };

        let temp_file = path.to_path_buf();
        if let Err(e) = path.close() {
            tracing::warn!(
                path = %temp_file.display(),
                error = %e,
                "Failed to remove temp upload, leaving it for the startup sweep"
            );
        }
    }
}
