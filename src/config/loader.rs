//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 未配置 CA 证书时回退读取的环境变量
const CA_CERT_FALLBACK_ENV: &str = "SSL_CERT_FILE";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `FLOORGATE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `FLOORGATE_SERVER__PORT=8080`
/// - `FLOORGATE_MEMORY_API__BASE_URL=https://appfloor.in`
/// - `FLOORGATE_MEMORY_API__VERIFY_SSL=false`
/// - `FLOORGATE_MEMORY_API__SSL_CA_CERT=/etc/ssl/corp.pem`
/// - `FLOORGATE_CORS__ALLOWED_ORIGINS=https://app.example.com`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("server.max_body_bytes", 50 * 1024 * 1024)?
        .set_default("memory_api.base_url", "https://appfloor.in")?
        .set_default("memory_api.verify_ssl", "true")?
        .set_default("memory_api.ssl_ca_cert", "")?
        .set_default("memory_api.timeout_secs", 60)?
        .set_default(
            "cors.allowed_origins",
            "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173,http://127.0.0.1:5173",
        )?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: FLOORGATE_MEMORY_API__BASE_URL=https://appfloor.in
    builder = builder.add_source(
        Environment::with_prefix("FLOORGATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_ca_cert_fallback(&mut app_config, std::env::var(CA_CERT_FALLBACK_ENV).ok());

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 未显式配置 CA 证书时使用 `SSL_CERT_FILE`
fn apply_ca_cert_fallback(config: &mut AppConfig, fallback: Option<String>) {
    if !config.memory_api.ssl_ca_cert.trim().is_empty() {
        return;
    }
    if let Some(path) = fallback.filter(|p| !p.trim().is_empty()) {
        config.memory_api.ssl_ca_cert = path;
    }
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    let base_url = config.memory_api.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Memory API base URL cannot be empty".to_string(),
        ));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "Memory API base URL must start with http:// or https://: {}",
            base_url
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Body: {} bytes", config.server.max_body_bytes);
    tracing::info!("Memory API: {}", config.memory_api.base_url);
    tracing::info!("Verify SSL: {}", config.memory_api.verify_ssl_enabled());
    match config.memory_api.ca_cert_path() {
        Some(path) => tracing::info!("CA Cert: {}", path.display()),
        None => tracing::info!("CA Cert: (system trust store)"),
    }
    tracing::info!("Memory API Timeout: {}s", config.memory_api.timeout_secs);
    tracing::info!("CORS Origins: {}", config.cors.origins().join(", "));
    tracing::info!("Upload Directory: {:?}", config.upload.dir());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_bad_base_url() {
        let mut config = AppConfig::default();
        config.memory_api.base_url = String::new();
        assert!(validate_config(&config).is_err());

        config.memory_api.base_url = "appfloor.in".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_ca_cert_fallback_only_when_unset() {
        let mut config = AppConfig::default();
        apply_ca_cert_fallback(&mut config, Some("/etc/ssl/bundle.pem".to_string()));
        assert_eq!(config.memory_api.ssl_ca_cert, "/etc/ssl/bundle.pem");

        apply_ca_cert_fallback(&mut config, Some("/other.pem".to_string()));
        assert_eq!(config.memory_api.ssl_ca_cert, "/etc/ssl/bundle.pem");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[memory_api]
base_url = "http://localhost:4010"
verify_ssl = "off"
ssl_ca_cert = "/tmp/ca.pem"

[cors]
allowed_origins = "https://app.example.com"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.memory_api.base_url, "http://localhost:4010");
        assert!(!config.memory_api.verify_ssl_enabled());
        assert_eq!(config.cors.origins(), vec!["https://app.example.com"]);
    }
}
