//! 路由测试工具

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::infrastructure::adapters::fake_memory_client::{
    FakeMemoryClient, FakeMemoryClientFactory,
};
use crate::infrastructure::adapters::UploadDir;

use super::routes::create_routes;
use super::state::AppState;

const BOUNDARY: &str = "floorgate-test-boundary";

/// 基于 fake 客户端的测试应用
pub struct TestApp {
    pub router: Router,
    pub factory: Arc<FakeMemoryClientFactory>,
    pub upload_dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new(client: FakeMemoryClient) -> Self {
        Self::with_factory(FakeMemoryClientFactory::new(client)).await
    }

    pub async fn with_factory(factory: FakeMemoryClientFactory) -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::prepare(upload_dir.path()).await.unwrap();
        let factory = Arc::new(factory);
        let state = AppState::new(factory.clone(), uploads);

        Self {
            router: create_routes().with_state(Arc::new(state)),
            factory,
            upload_dir,
        }
    }

    pub fn upload_path(&self) -> &Path {
        self.upload_dir.path()
    }

    /// 上传目录中剩余的文件数
    pub fn leftover_uploads(&self) -> usize {
        std::fs::read_dir(self.upload_path()).unwrap().count()
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// 构造 multipart 请求，files 为 (字段名, 文件名, 内容)
pub fn multipart_request(
    uri: &str,
    texts: &[(&str, &str)],
    files: &[(&str, &str, &str)],
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    for (name, file_name, content) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
