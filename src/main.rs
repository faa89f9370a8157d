//! Maji Config 命令行入口
//!
//! 远程配置客户端的调试与运维工具

use anyhow::{Context, Result};
use clap::Parser;
use maji_config::cli::{command_for, Args};
use maji_config::logging::{LogConfig, LoggingSystem};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.into(),
        json_format: args.json_logs,
        ..Default::default()
    };
    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    debug!("{} v{} 启动", maji_config::APP_NAME, maji_config::VERSION);

    // 执行命令
    if let Err(e) = command_for(&args.command).execute(&args).await {
        error!("命令执行失败: {}", e);
        eprintln!("错误: {e}");
        std::process::exit(1);
    }

    Ok(())
}
