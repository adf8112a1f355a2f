//! Memory API Port - 外部记忆服务抽象
//!
//! 定义记忆服务调用的抽象接口，具体实现在 infrastructure/adapters 层。
//! 每个入站请求通过 `MemoryClientFactory` 获得一个独立的客户端，
//! 客户端之间不共享可变状态。

use async_trait::async_trait;
use http::HeaderMap;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{
    ConversationsQuery, EditFloorRequest, EventRequest, FloorQuery, QueryRequest,
    RecentEventsQuery, SendValidationCodeRequest, SignInEmailRequest, SignInMobileRequest,
    SignUpRequest, ThreadsQuery,
};

/// 记忆服务调用错误
#[derive(Debug, Clone, Error)]
pub enum MemoryApiError {
    /// 上游返回非 2xx 状态
    #[error("Memory API returned HTTP {status}")]
    Status { status: u16, body: Option<String> },

    /// TLS 证书校验失败
    #[error("TLS certificate verification failed: {0}")]
    Tls(String),

    /// 连接、超时等传输层失败
    #[error("Memory API transport error: {0}")]
    Transport(String),

    /// 入站令牌无法作为请求头发送
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    /// 客户端配置错误（base URL 等）
    #[error("Memory API client misconfigured: {0}")]
    Config(String),

    /// 本地 I/O 失败（CA 证书、上传文件）
    #[error("I/O error: {0}")]
    Io(String),
}

/// 错误文本是否表明证书校验失败
pub fn is_certificate_failure(text: &str) -> bool {
    let lowered = text.to_lowercase();
    lowered.contains("certificate verify failed")
        || lowered.contains("certificate_verify_failed")
        || lowered.contains("invalid peer certificate")
}

/// 上游成功响应
#[derive(Debug, Clone)]
pub struct MemoryReply {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Value,
}

impl MemoryReply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            body,
        }
    }
}

/// 已落盘的上传文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// 临时文件路径
    pub path: PathBuf,
    /// 转发给上游的文件名
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: u64,
}

/// Memory API Port
#[async_trait]
pub trait MemoryApiPort: Send + Sync {
    async fn query(&self, request: &QueryRequest) -> Result<MemoryReply, MemoryApiError>;

    /// 创建事件，零或一个附件
    async fn create_event(
        &self,
        request: &EventRequest,
        file: Option<&UploadedFile>,
    ) -> Result<MemoryReply, MemoryApiError>;

    /// 创建事件，多个附件在同一个 multipart 请求中以重复的 `files` 字段发送
    async fn create_event_with_files(
        &self,
        request: &EventRequest,
        files: &[UploadedFile],
    ) -> Result<MemoryReply, MemoryApiError>;

    async fn recent_events(
        &self,
        query: &RecentEventsQuery,
    ) -> Result<MemoryReply, MemoryApiError>;

    async fn floor_information(&self, query: &FloorQuery)
        -> Result<MemoryReply, MemoryApiError>;

    async fn edit_floor(
        &self,
        request: &EditFloorRequest,
        logo: Option<&UploadedFile>,
    ) -> Result<MemoryReply, MemoryApiError>;

    async fn conversations(
        &self,
        query: &ConversationsQuery,
    ) -> Result<MemoryReply, MemoryApiError>;

    async fn conversation_threads(
        &self,
        query: &ThreadsQuery,
    ) -> Result<MemoryReply, MemoryApiError>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<MemoryReply, MemoryApiError>;

    async fn sign_in_with_email(
        &self,
        request: &SignInEmailRequest,
    ) -> Result<MemoryReply, MemoryApiError>;

    async fn sign_in_with_mobile(
        &self,
        request: &SignInMobileRequest,
    ) -> Result<MemoryReply, MemoryApiError>;

    async fn send_validation_code(
        &self,
        request: &SendValidationCodeRequest,
    ) -> Result<MemoryReply, MemoryApiError>;
}

/// 按请求创建记忆服务客户端
#[async_trait]
pub trait MemoryClientFactory: Send + Sync {
    async fn create(
        &self,
        access_token: Option<&str>,
    ) -> Result<Arc<dyn MemoryApiPort>, MemoryApiError>;
}
