//! 配置刷新模块
//!
//! 提供配置拉取和定时刷新调度功能

pub mod fetcher;
pub mod scheduler;

// 重新导出主要类型
pub use fetcher::{ConfigFetcher, HttpConfigFetcher};
pub use scheduler::{default_error_handler, ErrorHandler, RefreshScheduler, Refresher};
