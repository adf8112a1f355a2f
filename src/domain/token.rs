//! Bearer Token - Authorization 头解析与回传

use http::header::AUTHORIZATION;
use http::HeaderMap;
use serde_json::Value;

const BEARER_PREFIX: &str = "bearer ";

/// 从 Authorization 头提取访问令牌
///
/// 支持 `Bearer <token>`（前缀大小写不敏感）和裸令牌两种形式。
///
/// 只有 `Bearer` 一词时视为没有令牌。
pub fn extract_access_token(authorization: Option<&str>) -> Option<String> {
    let value = authorization?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(BEARER_PREFIX.trim_end()) {
        return None;
    }

    match value.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            let token = value[BEARER_PREFIX.len()..].trim();
            (!token.is_empty()).then(|| token.to_string())
        }
        _ => Some(value.to_string()),
    }
}

/// 日志用的令牌脱敏
pub fn mask_token(token: Option<&str>) -> Option<String> {
    let value = token?.trim();
    if value.is_empty() {
        return None;
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 14 {
        return Some("***".to_string());
    }

    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    Some(format!("{}...{}", head, tail))
}

/// 取上游响应中第一个非空的 Authorization 头
pub fn find_authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(AUTHORIZATION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// 将令牌写入响应体的 `token` 字段，已有值时不覆盖
pub fn attach_token(body: Value, authorization: Option<&str>) -> Value {
    let Value::Object(mut map) = body else {
        return body;
    };

    if let Some(token) = extract_access_token(authorization) {
        map.entry("token").or_insert(Value::String(token));
    }

    Value::Object(map)
}
