//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::AUTHORIZATION;
use http::HeaderValue;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::AppConfig;

/// HTTP 服务器
pub struct HttpServer {
    addr: String,
    max_body_bytes: usize,
    origins: Vec<String>,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: &AppConfig, state: AppState) -> Self {
        Self {
            addr: config.server.addr(),
            max_body_bytes: config.server.max_body_bytes,
            origins: config.cors.origins(),
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn router(&self) -> Router {
        create_routes()
            .layer(DefaultBodyLimit::max(self.max_body_bytes))
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&self.origins))
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.router();

        info!("Starting HTTP server on {} (with graceful shutdown)", self.addr);

        let listener = TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

/// CORS 配置
///
/// 携带凭证时不能使用通配 `Any`，方法与请求头改为镜像请求。
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::fake_memory_client::{
        FakeMemoryClient, FakeMemoryClientFactory,
    };
    use crate::infrastructure::adapters::UploadDir;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    async fn server(upload_dir: &std::path::Path) -> HttpServer {
        let uploads = UploadDir::prepare(upload_dir).await.unwrap();
        let factory = Arc::new(FakeMemoryClientFactory::new(FakeMemoryClient::default()));
        HttpServer::new(&AppConfig::default(), AppState::new(factory, uploads))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/memory/query")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "authorization,content-type")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_preflight_from_allowed_origin() {
        let dir = tempfile::tempdir().unwrap();
        let router = server(dir.path()).await.router();

        let response = router.oneshot(preflight("http://localhost:5173")).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "http://localhost:5173"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-methods"], "POST");
        assert_eq!(
            headers["access-control-allow-headers"],
            "authorization,content-type"
        );
    }

    #[tokio::test]
    async fn test_preflight_from_unknown_origin() {
        let dir = tempfile::tempdir().unwrap();
        let router = server(dir.path()).await.router();

        let response = router.oneshot(preflight("https://evil.example")).await.unwrap();

        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }

    #[tokio::test]
    async fn test_authorization_is_exposed() {
        let dir = tempfile::tempdir().unwrap();
        let router = server(dir.path()).await.router();

        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://127.0.0.1:3000")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-expose-headers"],
            "authorization"
        );
    }
}
