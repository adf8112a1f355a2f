//! Inbound Payload - 无类型请求体的字段提取
//!
//! JSON 请求体、查询参数和 multipart 文本字段统一转为 `Payload`，
//! 再由 `requests` 中的各个构造函数转为强类型请求。

use serde_json::{Map, Value};

use super::errors::FieldError;

/// 入站请求的键值映射
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// 从 JSON 值构造，非对象视为非法请求体
    pub fn from_value(value: Value) -> Result<Self, FieldError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(FieldError::NotAnObject),
        }
    }

    /// 从查询参数或表单文本字段构造
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), Value::String(value.into()));
    }

    /// 必填字符串：缺失、null 或去空白后为空均报 `MissingField`
    pub fn required_string(&self, key: &str) -> Result<String, FieldError> {
        self.optional_string(key)
            .ok_or_else(|| FieldError::missing(key))
    }

    /// 可选字符串：规则同 `required_string`，缺失时返回 `None`
    pub fn optional_string(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(non_blank_text)
    }

    /// 必填字符串列表：过滤空白元素后不能为空
    pub fn required_string_list(&self, key: &str) -> Result<Vec<String>, FieldError> {
        let items = match self.0.get(key) {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(FieldError::missing(key)),
        };

        let normalized: Vec<String> = items.iter().filter_map(non_blank_text).collect();
        if normalized.is_empty() {
            return Err(FieldError::missing(key));
        }

        Ok(normalized)
    }

    /// 嵌套对象，非对象值视为缺失
    pub fn optional_object(&self, key: &str) -> Option<Payload> {
        match self.0.get(key) {
            Some(Value::Object(map)) => Some(Self(map.clone())),
            _ => None,
        }
    }
}

/// 将标量转为去空白的文本；null 与空白串返回 `None`
pub fn non_blank_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
