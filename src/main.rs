//! Floorgate - 记忆服务 REST 网关
//!
//! - Domain: 请求校验与令牌处理
//! - Application: 记忆服务端口
//! - Infrastructure: http, adapters (memory_api, uploads)

use std::sync::Arc;

use floorgate::config::{load_config, print_config, AppConfig};
use floorgate::infrastructure::adapters::{HttpMemoryClientFactory, UploadDir};
use floorgate::infrastructure::http::{AppState, HttpServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Floorgate - memory API gateway");
    print_config(&config);

    // 准备上传目录并清理残留临时文件
    let upload_dir = config.upload.dir();
    let uploads = UploadDir::prepare(&upload_dir).await.map_err(|e| {
        anyhow::anyhow!("Failed to prepare upload dir {}: {}", upload_dir.display(), e)
    })?;

    let memory_clients = Arc::new(HttpMemoryClientFactory::from_settings(&config.memory_api));
    let state = AppState::new(memory_clients, uploads);
    let server = HttpServer::new(&config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，RUST_LOG 优先于配置
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},floorgate={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
