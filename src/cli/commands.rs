//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat, ValueKindArg};
use crate::client::{ConfigClient, Lookup};
use crate::config::{get_default_config_path, validate_config, ClientConfig, TomlConfigLoader};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 根据命令行参数生成客户端配置
///
/// 优先级：`--config` 指定的文件 > `--api-key` > 默认配置文件；
/// `--api-key` 和 `--host` 总是覆盖文件中的值
pub async fn resolve_client_config(args: &Args) -> Result<ClientConfig> {
    let loader = TomlConfigLoader::new(true);

    let mut config = if let Some(path) = &args.config {
        loader.load_from_file(path).await?
    } else if let Some(api_key) = &args.api_key {
        ClientConfig::new(api_key.clone())
    } else {
        let default_path = get_default_config_path();
        if !default_path.exists() {
            return Err(ConfigError::ValidationError(
                "缺少API密钥，请使用 --api-key 或配置文件".to_string(),
            )
            .into());
        }
        debug!("使用默认配置文件: {}", default_path.display());
        loader.load_from_file(&default_path).await?
    };

    if let Some(api_key) = &args.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(host) = &args.host {
        config.host = host.clone();
    }

    validate_config(&config).map_err(ConfigError::ValidationError)?;
    Ok(config)
}

/// 创建客户端并完成首次拉取
async fn start_client(args: &Args) -> Result<ConfigClient> {
    let config = resolve_client_config(args).await?;
    let client = ConfigClient::with_config(config)?;
    client.start().await?;
    Ok(client)
}

/// 读取单个配置值的命令
pub struct GetCommand;

#[async_trait]
impl Command for GetCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Get { key, kind } = &args.command else {
            return Ok(());
        };

        let client = start_client(args).await?;
        let lookup = match kind {
            ValueKindArg::Bool => client.get_bool(key).map(|v| v.to_string()),
            ValueKindArg::String => client.get_string(key),
            ValueKindArg::Number => client.get_f64(key).map(|v| v.to_string()),
            ValueKindArg::Raw => client.get(key).map(|v| v.to_string()),
        };
        client.stop();

        match lookup {
            Lookup::Found(value) => {
                println!("{value}");
                Ok(())
            }
            _ => Err(anyhow::anyhow!("未找到配置键: {}", key).into()),
        }
    }
}

/// 输出完整快照的命令
pub struct DumpCommand;

#[async_trait]
impl Command for DumpCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Dump { format } = &args.command else {
            return Ok(());
        };

        let client = start_client(args).await?;
        let snapshot = client
            .snapshot()
            .ok_or_else(|| anyhow::anyhow!("配置快照不可用"))?;
        client.stop();

        let sorted: BTreeMap<_, _> = snapshot.values().iter().collect();
        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&sorted).map_err(anyhow::Error::from)?;
                println!("{json}");
            }
            OutputFormat::Text => {
                for (key, value) in sorted {
                    println!("{key} = {value}");
                }
            }
        }
        Ok(())
    }
}

/// 持续输出配置值的命令
pub struct WatchCommand;

#[async_trait]
impl Command for WatchCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let Commands::Watch { keys, every_ms } = &args.command else {
            return Ok(());
        };

        let client = start_client(args).await?;
        let mut ticker = tokio::time::interval(Duration::from_millis((*every_ms).max(1)));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    for key in keys {
                        match client.get(key) {
                            Lookup::Found(value) => println!("{key}: {value}"),
                            _ => println!("no key `{key}` set"),
                        }
                    }
                }
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    info!("收到中断信号，停止监听");
                    break;
                }
            }
        }

        client.stop();
        Ok(())
    }
}

/// 验证配置文件的命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let config = resolve_client_config(args).await?;
        println!("配置有效");
        println!("  服务地址: {}", config.endpoint());
        println!("  刷新间隔: {}ms", config.refresh_interval_ms);
        println!("  请求超时: {}ms", config.request_timeout_ms);
        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, _args: &Args) -> Result<()> {
        println!("{} v{}", crate::APP_NAME, crate::VERSION);
        println!("{}", crate::APP_DESCRIPTION);
        Ok(())
    }
}

/// 根据子命令选择处理器
pub fn command_for(command: &Commands) -> Box<dyn Command> {
    match command {
        Commands::Get { .. } => Box::new(GetCommand),
        Commands::Dump { .. } => Box::new(DumpCommand),
        Commands::Watch { .. } => Box::new(WatchCommand),
        Commands::Validate => Box::new(ValidateCommand),
        Commands::Version => Box::new(VersionCommand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_from_api_key_and_host() {
        let args = parse(&[
            "maji-config",
            "--api-key",
            "XXX",
            "--host",
            "http://localhost:4000",
            "validate",
        ]);
        let config = resolve_client_config(&args).await.unwrap();
        assert_eq!(config.api_key, "XXX");
        assert_eq!(config.endpoint(), "http://localhost:4000/getConfig");
    }

    #[tokio::test]
    async fn test_resolve_file_with_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
api_key = "from-file"
host = "http://file.example.com"
refresh_interval_ms = 2000
"#,
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = parse(&[
            "maji-config",
            "--config",
            &path,
            "--host",
            "http://cli.example.com",
            "validate",
        ]);
        let config = resolve_client_config(&args).await.unwrap();

        assert_eq!(config.host, "http://cli.example.com");
        assert_eq!(config.refresh_interval_ms, 2000);
    }

    #[tokio::test]
    async fn test_resolve_rejects_invalid_host() {
        let args = parse(&["maji-config", "--api-key", "XXX", "--host", "ftp://nope", "validate"]);
        assert!(resolve_client_config(&args).await.is_err());
    }

    #[tokio::test]
    async fn test_get_command_against_server() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/getConfig")
            .with_status(200)
            .with_body(r#"{"foo":"bar"}"#)
            .create_async()
            .await;
        let url = server.url();

        let args = parse(&["maji-config", "-k", "XXX", "--host", &url, "get", "foo"]);
        assert!(command_for(&args.command).execute(&args).await.is_ok());

        let args = parse(&[
            "maji-config",
            "-k",
            "XXX",
            "--host",
            &url,
            "get",
            "foo",
            "--kind",
            "bool",
        ]);
        assert!(command_for(&args.command).execute(&args).await.is_err());
    }
}
