//! Memory Client Factory - 按请求构造记忆服务客户端

use async_trait::async_trait;
use std::sync::Arc;

use super::http_memory_client::{HttpMemoryClient, HttpMemoryClientConfig};
use crate::application::ports::{MemoryApiError, MemoryApiPort, MemoryClientFactory};
use crate::config::MemoryApiConfig;

/// 基于 reqwest 的客户端工厂
///
/// CA 证书每次构造时重新读取，证书轮换无需重启。
pub struct HttpMemoryClientFactory {
    config: HttpMemoryClientConfig,
}

impl HttpMemoryClientFactory {
    pub fn new(config: HttpMemoryClientConfig) -> Self {
        Self { config }
    }

    pub fn from_settings(settings: &MemoryApiConfig) -> Self {
        Self::new(HttpMemoryClientConfig::from(settings))
    }

    pub fn config(&self) -> &HttpMemoryClientConfig {
        &self.config
    }

    async fn read_ca_cert(&self) -> Result<Option<Vec<u8>>, MemoryApiError> {
        let Some(path) = &self.config.ca_cert else {
            return Ok(None);
        };

        let pem = tokio::fs::read(path).await.map_err(|e| {
            MemoryApiError::Io(format!(
                "failed to read CA certificate {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Some(pem))
    }
}

#[async_trait]
impl MemoryClientFactory for HttpMemoryClientFactory {
    async fn create(
        &self,
        access_token: Option<&str>,
    ) -> Result<Arc<dyn MemoryApiPort>, MemoryApiError> {
        let pem = self.read_ca_cert().await?;
        let client = HttpMemoryClient::new(&self.config, pem.as_deref(), access_token)?;
        Ok(Arc::new(client))
    }
}
