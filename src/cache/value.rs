//! 配置值类型
//!
//! 在解码阶段把JSON值转换为带标签的配置值，访问器通过模式匹配收窄类型

use serde::Serialize;
use serde_json::Number;
use std::collections::HashMap;
use std::fmt;

/// 配置值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// 空值
    Null,
    /// 布尔值
    Bool(bool),
    /// 数字
    Number(Number),
    /// 字符串
    String(String),
    /// 数组
    Array(Vec<ConfigValue>),
    /// 嵌套对象
    Object(HashMap<String, ConfigValue>),
}

/// 配置值的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ConfigValue {
    /// 获取值的类别
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// 布尔值，类型不符时返回 `None`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// 字符串值，类型不符时返回 `None`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// 浮点数值
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.as_f64(),
            _ => None,
        }
    }

    /// 整数值，只有可以无损表示为 `i64` 的数字才返回
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(value) => value.as_i64(),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Null => write!(f, "null"),
            other => match serde_json::to_string(other) {
                Ok(json) => write!(f, "{json}"),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conversion_keeps_tags() {
        let value = ConfigValue::from(json!({
            "flag": true,
            "name": "hello",
            "count": 3,
            "ratio": 0.5,
            "nested": {"inner": [1, null]}
        }));

        let ConfigValue::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(map["flag"].kind(), ValueKind::Bool);
        assert_eq!(map["name"].kind(), ValueKind::String);
        assert_eq!(map["count"].as_i64(), Some(3));
        assert_eq!(map["ratio"].as_f64(), Some(0.5));
        assert_eq!(map["ratio"].as_i64(), None);
        assert_eq!(map["nested"].kind(), ValueKind::Object);
    }

    #[test]
    fn test_narrowing_rejects_other_kinds() {
        let s = ConfigValue::String("true".to_string());
        assert_eq!(s.as_bool(), None);
        assert_eq!(s.as_str(), Some("true"));

        let b = ConfigValue::Bool(false);
        assert_eq!(b.as_bool(), Some(false));
        assert_eq!(b.as_str(), None);
        assert_eq!(b.as_f64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ConfigValue::String("bar".into()).to_string(), "bar");
        assert_eq!(ConfigValue::from(json!([1, "a"])).to_string(), r#"[1,"a"]"#);
        assert_eq!(ValueKind::Number.to_string(), "number");
    }
}
