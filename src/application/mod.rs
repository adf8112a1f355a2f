//! Application Layer - 应用层
//!
//! 出站端口（记忆服务客户端、客户端工厂）的抽象定义

pub mod ports;

pub use ports::*;
