//! HTTP Handlers
//!
//! 每个处理函数：提取令牌与请求体 → 构造强类型请求 → 调用记忆服务 → 返回结果

mod auth;
mod conversations;
mod events;
mod floors;
mod health;
mod query;

pub use auth::*;
pub use conversations::*;
pub use events::*;
pub use floors::*;
pub use health::*;
pub use query::*;
