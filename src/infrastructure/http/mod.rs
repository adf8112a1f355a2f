//! HTTP Layer - RESTful API
//!
//! 面向浏览器客户端的 REST 接口，转发到记忆服务

pub mod error;
pub mod extract;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{cors_layer, HttpServer};
pub use state::AppState;
