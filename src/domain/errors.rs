//! Request Validation - Errors

use thiserror::Error;

/// 入站请求体校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Request body must be a JSON object")]
    NotAnObject,
}

impl FieldError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingField(key.into())
    }
}
