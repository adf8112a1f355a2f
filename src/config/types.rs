//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 配置为空时使用的 CORS 来源
const FALLBACK_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 记忆服务 API 配置
    #[serde(default)]
    pub memory_api: MemoryApiConfig,

    /// 跨域配置
    #[serde(default)]
    pub cors: CorsConfig,

    /// 上传临时文件配置
    #[serde(default)]
    pub upload: UploadConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节），用于文件上传
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024 // 50 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 记忆服务 API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryApiConfig {
    /// 上游基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 是否校验 TLS 证书；false/0/no/off 关闭
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: String,

    /// 额外信任的 CA 证书（PEM）路径
    #[serde(default)]
    pub ssl_ca_cert: String,

    /// 出站请求超时（秒），0 表示不限制
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://appfloor.in".to_string()
}

fn default_verify_ssl() -> String {
    "true".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for MemoryApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            verify_ssl: default_verify_ssl(),
            ssl_ca_cert: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MemoryApiConfig {
    pub fn verify_ssl_enabled(&self) -> bool {
        let normalized = self.verify_ssl.trim().to_lowercase();
        !matches!(normalized.as_str(), "0" | "false" | "no" | "off")
    }

    /// 非空白时返回 CA 证书路径
    pub fn ca_cert_path(&self) -> Option<PathBuf> {
        let path = self.ssl_ca_cert.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

/// 跨域配置
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// 逗号分隔的允许来源
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

fn default_allowed_origins() -> String {
    "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173,http://127.0.0.1:5173"
        .to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    /// 解析后的来源列表，为空时退回本地开发来源
    pub fn origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return FALLBACK_ORIGINS.iter().map(|s| s.to_string()).collect();
        }
        origins
    }
}

/// 上传临时文件配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadConfig {
    /// 临时目录，未设置时使用系统临时目录下的 floorgate-uploads
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl UploadConfig {
    pub fn dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("floorgate-uploads"))
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
