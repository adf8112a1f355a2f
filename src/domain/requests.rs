//! Memory API Requests - 强类型出站请求
//!
//! 每个端点一个结构体，在边界处完成必填/可选字段校验。

use serde::Serialize;

use super::errors::FieldError;
use super::payload::Payload;

const DEFAULT_FLAG: &str = "1";

// ============================================================================
// Query
// ============================================================================

/// 记忆查询请求
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub user_id: String,
    pub query: String,
    pub floor_ids: Vec<String>,
    pub app_id: String,
    pub include_metadata: String,
    pub summary_needed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<QueryFilters>,
}

/// 查询过滤条件，四个字段必须同时存在
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryFilters {
    pub time_from: String,
    pub time_to: String,
    pub filter_types: String,
    pub filter_tags: String,
}

impl QueryRequest {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            user_id: payload.required_string("user_id")?,
            query: payload.required_string("query")?,
            floor_ids: payload.required_string_list("floor_ids")?,
            app_id: payload.required_string("app_id")?,
            include_metadata: payload
                .optional_string("include_metadata")
                .unwrap_or_else(|| DEFAULT_FLAG.to_string()),
            summary_needed: payload
                .optional_string("summary_needed")
                .unwrap_or_else(|| DEFAULT_FLAG.to_string()),
            filters: payload
                .optional_object("filters")
                .and_then(|f| QueryFilters::from_payload(&f)),
        })
    }
}

impl QueryFilters {
    /// 不完整的过滤条件直接丢弃，不视为错误
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        Some(Self {
            time_from: payload.optional_string("time_from")?,
            time_to: payload.optional_string("time_to")?,
            filter_types: payload.optional_string("filter_types")?,
            filter_tags: payload.optional_string("filter_tags")?,
        })
    }
}

// ============================================================================
// Events & Floors
// ============================================================================

/// 创建事件（multipart 文本部分）
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub input_info: String,
    pub app_id: String,
}

impl EventRequest {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            input_info: payload.required_string("input_info")?,
            app_id: payload.required_string("app_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentEventsQuery {
    pub floor_id: String,
    pub app_id: String,
    pub user_id: Option<String>,
}

impl RecentEventsQuery {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            floor_id: payload.required_string("floor_id")?,
            app_id: payload.required_string("app_id")?,
            user_id: payload.optional_string("user_id"),
        })
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("floor_id", self.floor_id.as_str()), ("app_id", self.app_id.as_str())];
        push_optional(&mut pairs, "user_id", &self.user_id);
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloorQuery {
    pub floor_id: String,
    pub app_id: String,
    pub user_id: Option<String>,
}

impl FloorQuery {
    pub fn from_payload(floor_id: &str, payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            floor_id: path_segment(floor_id, "floor_id")?,
            app_id: payload.required_string("app_id")?,
            user_id: payload.optional_string("user_id"),
        })
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("app_id", self.app_id.as_str())];
        push_optional(&mut pairs, "user_id", &self.user_id);
        pairs
    }
}

/// 编辑 floor（multipart 文本部分，logo 文件单独传递）
#[derive(Debug, Clone, PartialEq)]
pub struct EditFloorRequest {
    pub floor_id: String,
    pub user_id: String,
    pub app_id: String,
    pub title: Option<String>,
    pub details: Option<String>,
}

impl EditFloorRequest {
    pub fn from_payload(floor_id: &str, payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            floor_id: path_segment(floor_id, "floor_id")?,
            user_id: payload.required_string("user_id")?,
            app_id: payload.required_string("app_id")?,
            title: payload.optional_string("title"),
            details: payload.optional_string("details"),
        })
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("user_id", self.user_id.clone()),
            ("app_id", self.app_id.clone()),
        ];
        push_optional_owned(&mut fields, "title", &self.title);
        push_optional_owned(&mut fields, "details", &self.details);
        fields
    }
}

// ============================================================================
// Conversations
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationsQuery {
    pub user_id: Option<String>,
    pub thread_id: Option<String>,
}

impl ConversationsQuery {
    pub fn from_payload(payload: &Payload) -> Self {
        Self {
            user_id: payload.optional_string("user_id"),
            thread_id: payload.optional_string("thread_id"),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        push_optional(&mut pairs, "user_id", &self.user_id);
        push_optional(&mut pairs, "thread_id", &self.thread_id);
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadsQuery {
    pub user_id: String,
    pub floor_id: String,
}

impl ThreadsQuery {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            user_id: payload.required_string("user_id")?,
            floor_id: payload.required_string("floor_id")?,
        })
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        vec![("user_id", self.user_id.as_str()), ("floor_id", self.floor_id.as_str())]
    }
}

// ============================================================================
// Auth
// ============================================================================

/// 注册（表单提交）
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpRequest {
    pub name: String,
    pub password: String,
    pub email_id: Option<String>,
    pub mobile_number: Option<String>,
    pub app_id: Option<String>,
}

impl SignUpRequest {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            name: payload.required_string("name")?,
            password: payload.required_string("password")?,
            email_id: payload.optional_string("email_id"),
            mobile_number: payload.optional_string("mobile_number"),
            app_id: payload.optional_string("app_id"),
        })
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("password", self.password.clone()),
        ];
        push_optional_owned(&mut fields, "email_id", &self.email_id);
        push_optional_owned(&mut fields, "mobile_number", &self.mobile_number);
        push_optional_owned(&mut fields, "app_id", &self.app_id);
        fields
    }
}

/// 邮箱登录（表单提交）
#[derive(Debug, Clone, PartialEq)]
pub struct SignInEmailRequest {
    pub email_id: String,
    pub pass_code: String,
    pub login_type: String,
    pub app_id: Option<String>,
}

impl SignInEmailRequest {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            email_id: payload.required_string("email_id")?,
            pass_code: payload.required_string("pass_code")?,
            login_type: payload.required_string("login_type")?,
            app_id: payload.optional_string("app_id"),
        })
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("email_id", self.email_id.clone()),
            ("pass_code", self.pass_code.clone()),
            ("login_type", self.login_type.clone()),
        ];
        push_optional_owned(&mut fields, "app_id", &self.app_id);
        fields
    }
}

/// 手机号登录（JSON 提交）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignInMobileRequest {
    pub mobile_number: String,
    pub pass_code: String,
    pub login_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl SignInMobileRequest {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            mobile_number: payload.required_string("mobile_number")?,
            pass_code: payload.required_string("pass_code")?,
            login_type: payload.required_string("login_type")?,
            app_id: payload.optional_string("app_id"),
        })
    }
}

/// 发送验证码（JSON 提交）
///
/// 上游模型的手机号字段名为 `mobiles_number`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendValidationCodeRequest {
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(rename = "mobiles_number", skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

impl SendValidationCodeRequest {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldError> {
        Ok(Self {
            mode: payload.required_string("mode")?,
            user_id: payload.optional_string("user_id"),
            email_id: payload.optional_string("email_id"),
            mobile_number: payload.optional_string("mobile_number"),
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn path_segment(value: &str, key: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::missing(key));
    }
    Ok(trimmed.to_string())
}

fn push_optional<'a>(
    pairs: &mut Vec<(&'static str, &'a str)>,
    key: &'static str,
    value: &'a Option<String>,
) {
    if let Some(v) = value {
        pairs.push((key, v.as_str()));
    }
}

fn push_optional_owned(
    fields: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: &Option<String>,
) {
    if let Some(v) = value {
        fields.push((key, v.clone()));
    }
}
