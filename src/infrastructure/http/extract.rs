//! Extractors - 入站请求的令牌与请求体提取
//!
//! 提取失败统一转为 `ApiError::InvalidPayload`，保证响应为错误信封。

use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;

use crate::domain::{extract_access_token, find_authorization, mask_token, Payload};

use super::error::ApiError;

/// 入站 Authorization 头中的访问令牌
#[derive(Debug, Clone, Default)]
pub struct AccessToken(pub Option<String>);

impl AccessToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// 日志用的脱敏形式
    pub fn masked(&self) -> String {
        mask_token(self.as_deref()).unwrap_or_else(|| "-".to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = find_authorization(&parts.headers);
        Ok(Self(extract_access_token(header.as_deref())))
    }
}

/// JSON 对象请求体
#[derive(Debug)]
pub struct JsonPayload(pub Payload);

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(Self(Payload::from_value(value)?))
    }
}

/// 查询参数
#[derive(Debug)]
pub struct QueryPayload(pub Payload);

#[async_trait]
impl<S> FromRequestParts<S> for QueryPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidPayload(e.body_text()))?;
        Ok(Self(Payload::from_pairs(params)))
    }
}
