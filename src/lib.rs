//! Maji Config - 远程键值配置客户端
//!
//! 通过HTTP拉取远程配置并缓存在内存中，支持：
//! - 按固定间隔后台刷新
//! - 无锁的快照原子替换
//! - 带类型的配置读取（未就绪/未找到语义）
//! - TOML配置文件与结构化日志
//!
//! ```no_run
//! # async fn example() -> maji_config::Result<()> {
//! use maji_config::ConfigClient;
//!
//! let client = ConfigClient::new("my-api-key")?;
//! client.start().await?;
//!
//! let (enabled, found) = client.get_bool("feature_enabled").into_pair();
//! if found && enabled {
//!     // ...
//! }
//!
//! client.stop();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod refresh;

// 重新导出主要类型
pub use cache::{ConfigValue, Snapshot, SnapshotCache, ValueKind};
pub use client::{ClientState, ConfigClient, Lookup};
pub use config::{ClientConfig, DEFAULT_HOST};
pub use error::{ConfigClientError, ConfigError, Result};
pub use refresh::{ConfigFetcher, ErrorHandler, HttpConfigFetcher};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
