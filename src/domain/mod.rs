//! Domain Layer - 领域层
//!
//! 入站请求的校验与整形：
//! - payload: 无类型请求体的字段提取
//! - requests: 每个记忆服务端点的强类型请求
//! - token: Bearer 令牌解析、脱敏与回传

mod errors;
mod payload;
mod requests;
mod token;

pub use errors::FieldError;
pub use payload::{non_blank_text, Payload};
pub use requests::{
    ConversationsQuery, EditFloorRequest, EventRequest, FloorQuery, QueryFilters, QueryRequest,
    RecentEventsQuery, SendValidationCodeRequest, SignInEmailRequest, SignInMobileRequest,
    SignUpRequest, ThreadsQuery,
};
pub use token::{attach_token, extract_access_token, find_authorization, mask_token};
