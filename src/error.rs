//! 错误处理模块
//!
//! 定义配置客户端的统一错误类型

use thiserror::Error;

/// 配置客户端的主要错误类型
#[derive(Error, Debug)]
pub enum ConfigClientError {
    /// 网络传输错误（连接失败、DNS解析失败、传输层超时）
    #[error("请求配置失败: {0}")]
    Transport(#[from] reqwest::Error),

    /// 响应状态码不是200
    #[error("config: {status} response")]
    Status { status: u16 },

    /// 响应体为空
    #[error("配置响应体为空")]
    EmptyBody,

    /// 响应体无法解析为键值映射
    #[error("配置解析失败: {0}")]
    Decode(String),

    /// 客户端设置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 客户端已经启动
    #[error("客户端已经启动")]
    AlreadyStarted,

    /// 客户端已经停止，不能再次启动
    #[error("客户端已经停止")]
    Stopped,

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl ConfigClientError {
    /// 是否为解码类错误（空响应体或无法解析）
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::EmptyBody | Self::Decode(_))
    }

    /// 非200响应时返回状态码
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ConfigClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_carries_code() {
        let err = ConfigClientError::Status { status: 400 };
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("400"));
        assert!(!err.is_decode());
    }

    #[test]
    fn test_decode_errors_are_grouped() {
        assert!(ConfigClientError::EmptyBody.is_decode());

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConfigClientError::from(json_err);
        assert!(err.is_decode());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_config_error_conversion() {
        let err: ConfigClientError = ConfigError::EnvVarError {
            var: "API_KEY".to_string(),
        }
        .into();
        assert!(err.to_string().contains("API_KEY"));
    }
}
