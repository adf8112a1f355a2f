//! HTTP Memory Client - 调用外部记忆服务
//!
//! 实现 MemoryApiPort trait，通过 HTTP 调用记忆服务。
//!
//! 上游 API:
//! - POST /api/memory/query                    (JSON)
//! - POST /api/memory/events                   (multipart: files*, input_info, app_id)
//! - GET  /api/memory/recent-events            (query)
//! - GET  /api/memory/floors/{floor_id}        (query)
//! - POST /api/memory/floors/{floor_id}/edit   (multipart)
//! - GET  /api/memory/conversations            (query)
//! - GET  /api/memory/threads                  (query)
//! - POST /auth-service/sign/up                (multipart)
//! - POST /auth-service/sign/in/with/email     (multipart)
//! - POST /auth-service/sign/in/with/mobile/number (JSON)
//! - POST /auth-service/send/validation/code   (JSON)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Certificate, Client, RequestBuilder, Url};
use serde_json::Value;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::application::ports::{
    is_certificate_failure, MemoryApiError, MemoryApiPort, MemoryReply, UploadedFile,
};
use crate::config::MemoryApiConfig;
use crate::domain::{
    ConversationsQuery, EditFloorRequest, EventRequest, FloorQuery, QueryRequest,
    RecentEventsQuery, SendValidationCodeRequest, SignInEmailRequest, SignInMobileRequest,
    SignUpRequest, ThreadsQuery,
};

const QUERY_PATH: &[&str] = &["api", "memory", "query"];
const EVENTS_PATH: &[&str] = &["api", "memory", "events"];
const RECENT_EVENTS_PATH: &[&str] = &["api", "memory", "recent-events"];
const CONVERSATIONS_PATH: &[&str] = &["api", "memory", "conversations"];
const THREADS_PATH: &[&str] = &["api", "memory", "threads"];
const SIGN_UP_PATH: &[&str] = &["auth-service", "sign", "up"];
const SIGN_IN_EMAIL_PATH: &[&str] = &["auth-service", "sign", "in", "with", "email"];
const SIGN_IN_MOBILE_PATH: &[&str] = &["auth-service", "sign", "in", "with", "mobile", "number"];
const VALIDATION_CODE_PATH: &[&str] = &["auth-service", "send", "validation", "code"];

/// HTTP 记忆服务客户端配置
#[derive(Debug, Clone)]
pub struct HttpMemoryClientConfig {
    /// 记忆服务基础 URL
    pub base_url: String,
    /// 是否校验 TLS 证书
    pub verify_ssl: bool,
    /// 额外信任的 CA 证书路径
    pub ca_cert: Option<PathBuf>,
    /// 请求超时时间（秒），0 表示不限制
    pub timeout_secs: u64,
}

impl Default for HttpMemoryClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://appfloor.in".to_string(),
            verify_ssl: true,
            ca_cert: None,
            timeout_secs: 60,
        }
    }
}

impl HttpMemoryClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl From<&MemoryApiConfig> for HttpMemoryClientConfig {
    fn from(config: &MemoryApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim().to_string(),
            verify_ssl: config.verify_ssl_enabled(),
            ca_cert: config.ca_cert_path(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// HTTP 记忆服务客户端
///
/// 每个入站请求构造一个实例，携带该请求的 Bearer 令牌。
pub struct HttpMemoryClient {
    client: Client,
    base_url: Url,
}

impl HttpMemoryClient {
    /// 创建客户端
    ///
    /// `ca_pem` 为已读取的 CA 证书内容，由工厂负责读取文件。
    pub fn new(
        config: &HttpMemoryClientConfig,
        ca_pem: Option<&[u8]>,
        access_token: Option<&str>,
    ) -> Result<Self, MemoryApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            MemoryApiError::Config(format!("invalid base URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MemoryApiError::Config(format!(
                "base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut builder = Client::builder().danger_accept_invalid_certs(!config.verify_ssl);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        if let Some(pem) = ca_pem {
            let certificate = Certificate::from_pem(pem)
                .map_err(|e| MemoryApiError::Io(format!("invalid CA certificate: {}", e)))?;
            builder = builder.add_root_certificate(certificate);
        }

        if let Some(token) = access_token.map(str::trim).filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| MemoryApiError::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);

            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| MemoryApiError::Config(error_chain(&e)))?;

        Ok(Self { client, base_url })
    }

    /// 拼接上游 URL，路径段自动转义
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn floor_endpoint(&self, floor_id: &str, edit: bool) -> Url {
        let mut segments = vec!["api", "memory", "floors", floor_id];
        if edit {
            segments.push("edit");
        }
        self.endpoint(&segments)
    }

    async fn send(&self, request: RequestBuilder) -> Result<MemoryReply, MemoryApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(classify_send_error)?;

        if !status.is_success() {
            tracing::debug!(
                status = status.as_u16(),
                body_len = text.len(),
                "Memory API returned error status"
            );
            return Err(MemoryApiError::Status {
                status: status.as_u16(),
                body: (!text.is_empty()).then_some(text),
            });
        }

        Ok(MemoryReply {
            status: status.as_u16(),
            headers,
            body: parse_body(&text),
        })
    }

    async fn send_event(
        &self,
        request: &EventRequest,
        files: &[&UploadedFile],
    ) -> Result<MemoryReply, MemoryApiError> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file_part(file).await?);
        }
        let form = form
            .text("input_info", request.input_info.clone())
            .text("app_id", request.app_id.clone());

        tracing::debug!(
            files = files.len(),
            app_id = %request.app_id,
            "Sending memory event"
        );

        self.send(self.client.post(self.endpoint(EVENTS_PATH)).multipart(form))
            .await
    }
}

#[async_trait]
impl MemoryApiPort for HttpMemoryClient {
    async fn query(&self, request: &QueryRequest) -> Result<MemoryReply, MemoryApiError> {
        tracing::debug!(
            user_id = %request.user_id,
            floors = request.floor_ids.len(),
            filtered = request.filters.is_some(),
            "Sending memory query"
        );
        self.send(self.client.post(self.endpoint(QUERY_PATH)).json(request))
            .await
    }

    async fn create_event(
        &self,
        request: &EventRequest,
        file: Option<&UploadedFile>,
    ) -> Result<MemoryReply, MemoryApiError> {
        let files: Vec<&UploadedFile> = file.into_iter().collect();
        self.send_event(request, &files).await
    }

    async fn create_event_with_files(
        &self,
        request: &EventRequest,
        files: &[UploadedFile],
    ) -> Result<MemoryReply, MemoryApiError> {
        let files: Vec<&UploadedFile> = files.iter().collect();
        self.send_event(request, &files).await
    }

    async fn recent_events(
        &self,
        query: &RecentEventsQuery,
    ) -> Result<MemoryReply, MemoryApiError> {
        let url = self.endpoint(RECENT_EVENTS_PATH);
        self.send(self.client.get(url).query(&query.query_pairs()))
            .await
    }

    async fn floor_information(
        &self,
        query: &FloorQuery,
    ) -> Result<MemoryReply, MemoryApiError> {
        let url = self.floor_endpoint(&query.floor_id, false);
        self.send(self.client.get(url).query(&query.query_pairs()))
            .await
    }

    async fn edit_floor(
        &self,
        request: &EditFloorRequest,
        logo: Option<&UploadedFile>,
    ) -> Result<MemoryReply, MemoryApiError> {
        let mut form = Form::new();
        for (name, value) in request.form_fields() {
            form = form.text(name, value);
        }
        if let Some(file) = logo {
            form = form.part("logo_file", file_part(file).await?);
        }

        let url = self.floor_endpoint(&request.floor_id, true);
        self.send(self.client.post(url).multipart(form)).await
    }

    async fn conversations(
        &self,
        query: &ConversationsQuery,
    ) -> Result<MemoryReply, MemoryApiError> {
        let url = self.endpoint(CONVERSATIONS_PATH);
        self.send(self.client.get(url).query(&query.query_pairs()))
            .await
    }

    async fn conversation_threads(
        &self,
        query: &ThreadsQuery,
    ) -> Result<MemoryReply, MemoryApiError> {
        let url = self.endpoint(THREADS_PATH);
        self.send(self.client.get(url).query(&query.query_pairs()))
            .await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<MemoryReply, MemoryApiError> {
        let form = text_form(request.form_fields());
        self.send(self.client.post(self.endpoint(SIGN_UP_PATH)).multipart(form))
            .await
    }

    async fn sign_in_with_email(
        &self,
        request: &SignInEmailRequest,
    ) -> Result<MemoryReply, MemoryApiError> {
        let form = text_form(request.form_fields());
        let url = self.endpoint(SIGN_IN_EMAIL_PATH);
        self.send(self.client.post(url).multipart(form)).await
    }

    async fn sign_in_with_mobile(
        &self,
        request: &SignInMobileRequest,
    ) -> Result<MemoryReply, MemoryApiError> {
        let url = self.endpoint(SIGN_IN_MOBILE_PATH);
        self.send(self.client.post(url).json(request)).await
    }

    async fn send_validation_code(
        &self,
        request: &SendValidationCodeRequest,
    ) -> Result<MemoryReply, MemoryApiError> {
        let url = self.endpoint(VALIDATION_CODE_PATH);
        self.send(self.client.post(url).json(request)).await
    }
}

fn text_form(fields: Vec<(&'static str, String)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
}

/// 以流的方式从临时文件读取上传内容
async fn file_part(file: &UploadedFile) -> Result<Part, MemoryApiError> {
    let handle = tokio::fs::File::open(&file.path).await.map_err(|e| {
        MemoryApiError::Io(format!(
            "failed to open upload {}: {}",
            file.path.display(),
            e
        ))
    })?;

    let body = reqwest::Body::wrap_stream(ReaderStream::new(handle));
    let part = Part::stream_with_length(body, file.size).file_name(file.file_name.clone());

    match &file.content_type {
        Some(content_type) => part.mime_str(content_type).map_err(|e| {
            MemoryApiError::Io(format!("invalid content type {}: {}", content_type, e))
        }),
        None => Ok(part),
    }
}

/// 空响应体为 null，非 JSON 响应体按字符串返回
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// reqwest 的错误信息分散在 source 链上，TLS 细节通常在最底层
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

fn classify_send_error(err: reqwest::Error) -> MemoryApiError {
    let text = error_chain(&err);
    if is_certificate_failure(&text) {
        MemoryApiError::Tls(text)
    } else if err.is_timeout() {
        MemoryApiError::Transport(format!("request timed out: {}", text))
    } else {
        MemoryApiError::Transport(text)
    }
}
