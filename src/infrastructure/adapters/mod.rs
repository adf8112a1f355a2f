//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod memory_api;
pub mod uploads;

pub use memory_api::*;
pub use uploads::*;
