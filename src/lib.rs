//! Floorgate - 记忆服务 REST 网关
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Payload: 无类型请求体的字段提取
//! - Requests: 每个记忆服务端点的强类型请求
//! - Token: Bearer 令牌解析、脱敏与回传
//!
//! 应用层 (application/):
//! - Ports: MemoryApiPort, MemoryClientFactory
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API、错误信封、CORS
//! - Adapters: reqwest 记忆服务客户端、上传临时文件

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
