//! 配置快照
//!
//! 一次拉取得到的完整键值配置，创建后不可修改

use crate::cache::value::ConfigValue;
use crate::error::{ConfigClientError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// 配置快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// 快照版本号，由缓存在发布时分配，未发布时为0
    pub version: u64,
    /// 拉取时间
    pub fetched_at: DateTime<Utc>,
    /// 配置键值
    values: HashMap<String, ConfigValue>,
}

impl Snapshot {
    /// 从键值映射创建快照
    pub fn new(values: HashMap<String, ConfigValue>) -> Self {
        Self {
            version: 0,
            fetched_at: Utc::now(),
            values,
        }
    }

    /// 获取配置值
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// 所有键，按字典序排列
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 键值映射的只读视图
    pub fn values(&self) -> &HashMap<String, ConfigValue> {
        &self.values
    }

    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }
}

/// 解码响应体为配置快照
///
/// # 参数
/// * `body` - HTTP响应体
///
/// # 返回
/// * `Result<Snapshot>` - 空响应体返回 `EmptyBody`，非JSON对象返回 `Decode`
pub fn decode_snapshot(body: &[u8]) -> Result<Snapshot> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ConfigClientError::EmptyBody);
    }

    let raw: serde_json::Value = serde_json::from_slice(body)?;
    let serde_json::Value::Object(map) = raw else {
        return Err(ConfigClientError::Decode(
            "响应体不是JSON对象".to_string(),
        ));
    };

    let values = map
        .into_iter()
        .map(|(key, value)| (key, ConfigValue::from(value)))
        .collect();

    Ok(Snapshot::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_object() {
        let snapshot = decode_snapshot(br#"{"foo":"bar","on":true}"#).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("foo").and_then(|v| v.as_str()), Some("bar"));
        assert_eq!(snapshot.get("on").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(snapshot.keys(), vec!["foo", "on"]);
        assert_eq!(snapshot.version, 0);
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(matches!(decode_snapshot(b""), Err(ConfigClientError::EmptyBody)));
        assert!(matches!(decode_snapshot(b" \n"), Err(ConfigClientError::EmptyBody)));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_snapshot(b"{not json").unwrap_err();
        assert!(matches!(err, ConfigClientError::Decode(_)));
    }

    #[test]
    fn test_decode_non_object() {
        let bodies: [&[u8]; 4] = [b"[1,2]", b"null", b"\"str\"", b"42"];
        for body in bodies {
            let err = decode_snapshot(body).unwrap_err();
            assert!(err.is_decode(), "body {:?} should fail", body);
        }
    }

    #[test]
    fn test_empty_object_is_valid() {
        let snapshot = decode_snapshot(b"{}").unwrap();
        assert!(snapshot.is_empty());
    }
}
