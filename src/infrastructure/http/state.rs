//! Application State
//!
//! 所有请求共享的只读状态

use std::sync::Arc;

use crate::application::ports::{MemoryApiPort, MemoryClientFactory};
use crate::infrastructure::adapters::UploadDir;

use super::error::ApiError;

/// 应用状态
pub struct AppState {
    /// 按请求构造记忆服务客户端
    pub memory_clients: Arc<dyn MemoryClientFactory>,
    /// 上传临时目录
    pub uploads: UploadDir,
}

impl AppState {
    pub fn new(memory_clients: Arc<dyn MemoryClientFactory>, uploads: UploadDir) -> Self {
        Self {
            memory_clients,
            uploads,
        }
    }

    /// 为当前请求构造携带令牌的客户端
    pub async fn memory_client(
        &self,
        access_token: Option<&str>,
    ) -> Result<Arc<dyn MemoryApiPort>, ApiError> {
        Ok(self.memory_clients.create(access_token).await?)
    }
}
