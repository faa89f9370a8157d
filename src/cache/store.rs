//! 快照缓存
//!
//! 使用 arc-swap 原子替换当前快照，读取无需加锁

use crate::cache::snapshot::Snapshot;
use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 线程安全的快照缓存
///
/// 写入只替换引用，已取得旧快照的读者继续看到完整的旧快照
#[derive(Debug, Default)]
pub struct SnapshotCache {
    current: ArcSwapOption<Snapshot>,
    versions: AtomicU64,
}

impl SnapshotCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 发布新快照并分配版本号
    ///
    /// # 返回
    /// * `Arc<Snapshot>` - 已发布的快照
    pub fn install(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let version = self.versions.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(snapshot.with_version(version));
        self.current.store(Some(Arc::clone(&snapshot)));
        debug!("发布配置快照，版本: {}, 键数量: {}", version, snapshot.len());
        snapshot
    }

    /// 当前快照，首次发布前为 `None`
    pub fn load(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    /// 是否已经发布过快照
    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::snapshot::decode_snapshot;
    use std::thread;

    #[test]
    fn test_empty_cache_not_ready() {
        let cache = SnapshotCache::new();
        assert!(!cache.is_ready());
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_install_replaces_whole_snapshot() {
        let cache = SnapshotCache::new();
        cache.install(decode_snapshot(br#"{"qux":"mux"}"#).unwrap());
        cache.install(decode_snapshot(br#"{"foo":"bar"}"#).unwrap());

        let current = cache.load().unwrap();
        assert_eq!(current.version, 2);
        assert!(current.contains_key("foo"));
        assert!(!current.contains_key("qux"));
    }

    #[test]
    fn test_readers_keep_old_snapshot() {
        let cache = SnapshotCache::new();
        let first = cache.install(decode_snapshot(br#"{"a":true}"#).unwrap());
        let held = cache.load().unwrap();

        cache.install(decode_snapshot(br#"{"b":false}"#).unwrap());

        assert!(Arc::ptr_eq(&first, &held));
        assert!(held.contains_key("a"));
        assert!(!cache.load().unwrap().contains_key("a"));
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_snapshot() {
        let cache = Arc::new(SnapshotCache::new());
        cache.install(decode_snapshot(br#"{"x":1,"y":1}"#).unwrap());

        let writer = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 2..200 {
                    let body = format!(r#"{{"x":{i},"y":{i}}}"#);
                    cache.install(decode_snapshot(body.as_bytes()).unwrap());
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = cache.load().unwrap();
                        let x = snapshot.get("x").and_then(|v| v.as_i64());
                        let y = snapshot.get("y").and_then(|v| v.as_i64());
                        assert_eq!(x, y);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
