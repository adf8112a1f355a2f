//! Memory API Adapter - 记忆服务 HTTP 客户端实现

mod client_factory;
#[cfg(test)]
pub mod fake_memory_client;
mod http_memory_client;

pub use client_factory::HttpMemoryClientFactory;
pub use http_memory_client::{HttpMemoryClient, HttpMemoryClientConfig};
