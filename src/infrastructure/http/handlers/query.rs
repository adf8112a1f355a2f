//! Query HTTP Handler - 记忆查询

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::QueryRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{AccessToken, JsonPayload};
use crate::infrastructure::http::state::AppState;

/// 查询记忆
pub async fn query_memory(
    State(state): State<Arc<AppState>>,
    token: AccessToken,
    JsonPayload(payload): JsonPayload,
) -> Result<Json<Value>, ApiError> {
    let request = QueryRequest::from_payload(&payload)?;
    let client = state.memory_client(token.as_deref()).await?;
    let reply = client.query(&request).await?;
    Ok(Json(reply.body))
}

#[cfg(test)]
mod tests {
    use crate::application::ports::{MemoryApiError, MemoryReply};
    use crate::infrastructure::adapters::fake_memory_client::{
        FakeMemoryClient, FakeMemoryClientFactory, RecordedCall,
    };
    use crate::infrastructure::http::test_support::{json_request, read_json, TestApp};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn query_body() -> Value {
        json!({
            "user_id": "u1",
            "query": "what happened at standup?",
            "floor_ids": ["f1"],
            "app_id": "a1",
        })
    }

    #[tokio::test]
    async fn test_query_passes_body_through() {
        let app = TestApp::new(FakeMemoryClient::replying(MemoryReply::ok(
            json!({"items": [1, 2]}),
        )))
        .await;

        let mut request = json_request("POST", "/memory/query", query_body());
        request
            .headers_mut()
            .insert("authorization", "Bearer abc123".parse().unwrap());
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({"items": [1, 2]}));
        assert_eq!(app.factory.tokens(), vec![Some("abc123".to_string())]);

        match &app.factory.calls()[0] {
            RecordedCall::Query(request) => {
                assert_eq!(request.user_id, "u1");
                assert_eq!(request.summary_needed, "1");
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_fields_never_reach_upstream() {
        for key in ["user_id", "query", "floor_ids", "app_id"] {
            let app = TestApp::new(FakeMemoryClient::default()).await;
            let mut body = query_body();
            body.as_object_mut().unwrap().remove(key);

            let response = app
                .router
                .clone()
                .oneshot(json_request("POST", "/memory/query", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = read_json(response).await;
            assert_eq!(body["error"]["message"], "Invalid request payload.");
            assert!(app.factory.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_partial_filters_are_not_forwarded() {
        let app = TestApp::new(FakeMemoryClient::default()).await;
        let mut body = query_body();
        body["filters"] = json!({"time_from": "2025-01-01", "filter_tags": "work"});

        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/memory/query", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        match &app.factory.calls()[0] {
            RecordedCall::Query(request) => assert!(request.filters.is_none()),
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_payload() {
        let app = TestApp::new(FakeMemoryClient::default()).await;
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/memory/query")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"user_id\":"))
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["message"], "Invalid request payload.");
    }

    #[tokio::test]
    async fn test_upstream_error_is_normalized() {
        let app = TestApp::new(FakeMemoryClient::failing(MemoryApiError::Status {
            status: 404,
            body: Some(r#"{"message":"bad floor"}"#.to_string()),
        }))
        .await;

        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/memory/query", query_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            read_json(response).await,
            json!({"error": {"message": "bad floor", "details": {"message": "bad floor"}}})
        );
    }

    #[tokio::test]
    async fn test_certificate_failure_returns_remediation() {
        let app = TestApp::new(FakeMemoryClient::failing(MemoryApiError::Tls(
            "invalid peer certificate: UnknownIssuer".to_string(),
        )))
        .await;

        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/memory/query", query_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = read_json(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("memory_api.ssl_ca_cert"));
        assert_eq!(
            body["error"]["details"],
            "invalid peer certificate: UnknownIssuer"
        );
    }

    #[tokio::test]
    async fn test_unreadable_ca_certificate_is_unexpected() {
        let app = TestApp::with_factory(FakeMemoryClientFactory::failing_create(
            MemoryApiError::Io("failed to read CA certificate /missing.pem".to_string()),
        ))
        .await;

        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/memory/query", query_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["error"]["message"], "Unexpected server error.");
    }
}
