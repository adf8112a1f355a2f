//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod memory_api;

pub use memory_api::{
    is_certificate_failure, MemoryApiError, MemoryApiPort, MemoryClientFactory, MemoryReply,
    UploadedFile,
};
