//! 配置加载器实现
//!
//! 提供TOML配置文件解析、环境变量替换和错误处理功能

use crate::config::types::{validate_config, ClientConfig};
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

/// 匹配 `${VAR_NAME}` 格式的环境变量引用
static ENV_VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Invalid env var regex")
});

/// TOML配置加载器
#[derive(Debug, Clone)]
pub struct TomlConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用 `${VAR}` 环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<ClientConfig>` - 加载并验证后的配置
    pub async fn load_from_file(&self, path: impl AsRef<Path>) -> Result<ClientConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {e}")))?;

        let config = self.load_from_string(&content)?;

        info!("成功加载配置文件: {}", path.display());
        debug!("配置服务地址: {}", config.host);

        Ok(config)
    }

    /// 从字符串加载配置
    pub fn load_from_string(&self, content: &str) -> Result<ClientConfig> {
        let content = self.substitute_env_vars(content)?;

        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {e}")))?;

        validate_config(&config).map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// 替换字符串中的环境变量，引用了未设置的变量时报错
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let mut missing = None;
        let result = ENV_VAR_REGEX.replace_all(content, |captures: &regex::Captures<'_>| {
            let var_name = &captures[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                if missing.is_none() {
                    missing = Some(var_name.to_string());
                }
                String::new()
            })
        });

        match missing {
            Some(var) => Err(ConfigError::EnvVarError { var }.into()),
            None => Ok(result.into_owned()),
        }
    }
}

impl Default for TomlConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

/// 获取默认配置文件路径
///
/// 当前目录存在 `maji-config.toml` 时优先使用，否则使用用户配置目录
pub fn get_default_config_path() -> PathBuf {
    let local = PathBuf::from("maji-config.toml");
    if local.exists() {
        return local;
    }

    dirs::config_dir()
        .map(|config_dir| config_dir.join("maji-config").join("config.toml"))
        .unwrap_or(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TEST_CONFIG_TOML: &str = r#"
api_key = "XXX"
host = "http://localhost:4000"
refresh_interval_ms = 1000
"#;

    const TEST_CONFIG_WITH_ENV_VARS: &str = r#"
api_key = "${MAJI_TEST_API_KEY}"
host = "${MAJI_TEST_HOST}"
"#;

    #[test]
    fn test_toml_parsing() {
        let loader = TomlConfigLoader::new(false);
        let config = loader.load_from_string(TEST_CONFIG_TOML).unwrap();

        assert_eq!(config.api_key, "XXX");
        assert_eq!(config.host, "http://localhost:4000");
        assert_eq!(config.refresh_interval_ms, 1000);
        assert_eq!(config.request_timeout_ms, 5000);
    }

    #[test]
    #[serial]
    fn test_env_var_substitution() {
        env::set_var("MAJI_TEST_API_KEY", "secret-key");
        env::set_var("MAJI_TEST_HOST", "https://config.example.com");

        let loader = TomlConfigLoader::new(true);
        let config = loader.load_from_string(TEST_CONFIG_WITH_ENV_VARS).unwrap();

        assert_eq!(config.api_key, "secret-key");
        assert_eq!(config.host, "https://config.example.com");

        env::remove_var("MAJI_TEST_API_KEY");
        env::remove_var("MAJI_TEST_HOST");
    }

    #[test]
    #[serial]
    fn test_env_var_substitution_missing_var() {
        let loader = TomlConfigLoader::new(true);
        let result = loader.load_from_string(r#"api_key = "${MAJI_TEST_MISSING_VAR}""#);

        let err = result.unwrap_err();
        assert!(err.to_string().contains("MAJI_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_validation_failure() {
        let loader = TomlConfigLoader::new(false);
        let result = loader.load_from_string(
            r#"
api_key = "XXX"
refresh_interval_ms = 0
"#,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TEST_CONFIG_TOML.as_bytes()).unwrap();

        let loader = TomlConfigLoader::new(false);
        let config = loader.load_from_file(file.path()).await.unwrap();
        assert_eq!(config.api_key, "XXX");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let loader = TomlConfigLoader::new(false);
        let err = loader
            .load_from_file("/nonexistent/maji-config.toml")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/maji-config.toml"));
    }

    #[test]
    fn test_substitute_env_vars_disabled() {
        let loader = TomlConfigLoader::new(false);
        let content = "test ${VAR} content";
        assert_eq!(loader.substitute_env_vars(content).unwrap(), content);
    }

    #[test]
    fn test_get_default_config_path() {
        let path = get_default_config_path();
        let path = path.to_string_lossy();
        assert!(path.contains("maji-config"));
        assert!(path.ends_with(".toml"));
    }
}
