//! 配置数据结构定义
//!
//! 定义客户端的连接设置和验证逻辑

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认的配置服务地址
pub const DEFAULT_HOST: &str = "https://api.config.maji.cloud";

/// 配置拉取路径
pub const CONFIG_PATH: &str = "/getConfig";

/// 客户端配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// API密钥
    pub api_key: String,
    /// 配置服务地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 刷新间隔（毫秒）
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
    /// 单次请求超时时间（毫秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

// 默认值函数
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_refresh_interval() -> u64 {
    5_000
}
fn default_request_timeout() -> u64 {
    5_000
}

impl ClientConfig {
    /// 使用默认设置创建配置
    ///
    /// # 参数
    /// * `api_key` - API密钥
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: default_host(),
            refresh_interval_ms: default_refresh_interval(),
            request_timeout_ms: default_request_timeout(),
        }
    }

    /// 设置服务地址
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// 设置刷新间隔
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval_ms = duration_to_millis(interval);
        self
    }

    /// 设置请求超时时间
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = duration_to_millis(timeout);
        self
    }

    /// 刷新间隔
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// 请求超时时间
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 拉取配置的完整URL
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), CONFIG_PATH)
    }
}

/// 不足1毫秒的非零时长按1毫秒计算
fn duration_to_millis(duration: Duration) -> u64 {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    if millis == 0 && !duration.is_zero() {
        1
    } else {
        millis
    }
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &ClientConfig) -> Result<(), String> {
    if config.api_key.trim().is_empty() {
        return Err("API密钥不能为空".to_string());
    }

    if !config.host.starts_with("http://") && !config.host.starts_with("https://") {
        return Err(format!("服务地址格式无效: {}", config.host));
    }

    if config.refresh_interval_ms == 0 {
        return Err("刷新间隔不能为0".to_string());
    }

    if config.request_timeout_ms == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    Ok(())
}
