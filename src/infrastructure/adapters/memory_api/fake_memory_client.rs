//! Fake Memory Client - 用于测试的记忆服务客户端
//!
//! 记录每次调用并返回预设结果，不发起网络请求。
//! 上传文件在调用时读取内容，便于断言临时文件的生命周期。

use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::application::ports::{
    MemoryApiError, MemoryApiPort, MemoryClientFactory, MemoryReply, UploadedFile,
};
use crate::domain::{
    ConversationsQuery, EditFloorRequest, EventRequest, FloorQuery, QueryRequest,
    RecentEventsQuery, SendValidationCodeRequest, SignInEmailRequest, SignInMobileRequest,
    SignUpRequest, ThreadsQuery,
};

/// 调用时读到的上传文件
#[derive(Debug, Clone, PartialEq)]
pub struct SeenFile {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

/// 被记录的调用
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Query(QueryRequest),
    CreateEvent(EventRequest, Option<SeenFile>),
    CreateEventWithFiles(EventRequest, Vec<SeenFile>),
    RecentEvents(RecentEventsQuery),
    FloorInformation(FloorQuery),
    EditFloor(EditFloorRequest, Option<SeenFile>),
    Conversations(ConversationsQuery),
    ConversationThreads(ThreadsQuery),
    SignUp(SignUpRequest),
    SignInWithEmail(SignInEmailRequest),
    SignInWithMobile(SignInMobileRequest),
    SendValidationCode(SendValidationCodeRequest),
}

/// Fake Memory Client
pub struct FakeMemoryClient {
    calls: Mutex<Vec<RecordedCall>>,
    outcome: Mutex<Result<MemoryReply, MemoryApiError>>,
}

impl Default for FakeMemoryClient {
    fn default() -> Self {
        Self::replying(MemoryReply::ok(json!({"status": "ok"})))
    }
}

impl FakeMemoryClient {
    pub fn replying(reply: MemoryReply) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Mutex::new(Ok(reply)),
        }
    }

    pub fn failing(error: MemoryApiError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Mutex::new(Err(error)),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) -> Result<MemoryReply, MemoryApiError> {
        self.calls.lock().unwrap().push(call);
        self.outcome.lock().unwrap().clone()
    }
}

fn seen(file: &UploadedFile) -> SeenFile {
    SeenFile {
        path: file.path.clone(),
        file_name: file.file_name.clone(),
        content_type: file.content_type.clone(),
        content: std::fs::read(&file.path).unwrap_or_default(),
    }
}

#[async_trait]
impl MemoryApiPort for FakeMemoryClient {
    async fn query(&self, request: &QueryRequest) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::Query(request.clone()))
    }

    async fn create_event(
        &self,
        request: &EventRequest,
        file: Option<&UploadedFile>,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::CreateEvent(request.clone(), file.map(seen)))
    }

    async fn create_event_with_files(
        &self,
        request: &EventRequest,
        files: &[UploadedFile],
    ) -> Result<MemoryReply, MemoryApiError> {
        let files = files.iter().map(seen).collect();
        self.record(RecordedCall::CreateEventWithFiles(request.clone(), files))
    }

    async fn recent_events(
        &self,
        query: &RecentEventsQuery,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::RecentEvents(query.clone()))
    }

    async fn floor_information(
        &self,
        query: &FloorQuery,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::FloorInformation(query.clone()))
    }

    async fn edit_floor(
        &self,
        request: &EditFloorRequest,
        logo: Option<&UploadedFile>,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::EditFloor(request.clone(), logo.map(seen)))
    }

    async fn conversations(
        &self,
        query: &ConversationsQuery,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::Conversations(query.clone()))
    }

    async fn conversation_threads(
        &self,
        query: &ThreadsQuery,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::ConversationThreads(query.clone()))
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::SignUp(request.clone()))
    }

    async fn sign_in_with_email(
        &self,
        request: &SignInEmailRequest,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::SignInWithEmail(request.clone()))
    }

    async fn sign_in_with_mobile(
        &self,
        request: &SignInMobileRequest,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::SignInWithMobile(request.clone()))
    }

    async fn send_validation_code(
        &self,
        request: &SendValidationCodeRequest,
    ) -> Result<MemoryReply, MemoryApiError> {
        self.record(RecordedCall::SendValidationCode(request.clone()))
    }
}

/// Fake 工厂，所有请求共享同一个 FakeMemoryClient
pub struct FakeMemoryClientFactory {
    client: Arc<FakeMemoryClient>,
    tokens: Mutex<Vec<Option<String>>>,
    create_error: Option<MemoryApiError>,
}

impl FakeMemoryClientFactory {
    pub fn new(client: FakeMemoryClient) -> Self {
        Self {
            client: Arc::new(client),
            tokens: Mutex::new(Vec::new()),
            create_error: None,
        }
    }

    /// 构造客户端阶段即失败
    pub fn failing_create(error: MemoryApiError) -> Self {
        Self {
            create_error: Some(error),
            ..Self::new(FakeMemoryClient::default())
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.client.calls()
    }

    /// 每次 create 收到的令牌
    pub fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemoryClientFactory for FakeMemoryClientFactory {
    async fn create(
        &self,
        access_token: Option<&str>,
    ) -> Result<Arc<dyn MemoryApiPort>, MemoryApiError> {
        self.tokens
            .lock()
            .unwrap()
            .push(access_token.map(str::to_string));
        if let Some(error) = &self.create_error {
            return Err(error.clone());
        }
        Ok(self.client.clone())
    }
}

/// 带响应头的成功回复
pub fn reply_with_header(name: &'static str, value: &str, body: Value) -> MemoryReply {
    let mut reply = MemoryReply::ok(body);
    if let Ok(value) = value.parse() {
        reply.headers.insert(name, value);
    }
    reply
}
