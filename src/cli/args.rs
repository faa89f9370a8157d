//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Maji Config - 远程配置客户端
#[derive(Parser, Debug, Clone)]
#[command(
    name = "maji-config",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long, value_name = "FILE", help = "配置文件路径")]
    pub config: Option<PathBuf>,

    /// API密钥，优先于配置文件
    #[arg(
        short = 'k',
        long,
        value_name = "KEY",
        help = "API密钥",
        env = "MAJI_CONFIG_API_KEY",
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// 配置服务地址，优先于配置文件
    #[arg(long, value_name = "URL", help = "配置服务地址")]
    pub host: Option<String>,

    /// 日志级别
    #[arg(short, long, value_enum, default_value = "warn", help = "日志级别")]
    pub log_level: LogLevel,

    /// 是否输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志")]
    pub json_logs: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 读取单个配置值
    Get {
        /// 配置键
        #[arg(value_name = "KEY")]
        key: String,

        /// 期望的值类型
        #[arg(long, value_enum, default_value = "raw", help = "值类型")]
        kind: ValueKindArg,
    },

    /// 输出完整的配置快照
    Dump {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 持续输出指定键的值，直到按下 Ctrl-C
    Watch {
        /// 配置键列表
        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,

        /// 输出间隔（毫秒）
        #[arg(long, value_name = "MILLIS", default_value = "1000", help = "输出间隔（毫秒）")]
        every_ms: u64,
    },

    /// 验证配置文件
    Validate,

    /// 显示版本信息
    Version,
}

/// 读取时使用的值类型
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum ValueKindArg {
    /// 布尔值
    Bool,
    /// 字符串
    String,
    /// 数字
    Number,
    /// 不做类型收窄
    Raw,
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}
