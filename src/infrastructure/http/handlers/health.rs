//! Health Handler
//!
//! 存活检查，不访问上游

use axum::Json;
use serde::Serialize;

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::fake_memory_client::FakeMemoryClient;
    use crate::infrastructure::http::test_support::{get_request, read_json, TestApp};
    use axum::http::StatusCode;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new(FakeMemoryClient::default()).await;

        let response = app.router.clone().oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(app.factory.tokens().is_empty());
    }
}
