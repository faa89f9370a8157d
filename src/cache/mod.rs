//! 配置缓存模块
//!
//! 提供配置值类型、快照解码和线程安全的快照缓存

pub mod snapshot;
pub mod store;
pub mod value;

// 重新导出主要类型
pub use snapshot::{decode_snapshot, Snapshot};
pub use store::SnapshotCache;
pub use value::{ConfigValue, ValueKind};
