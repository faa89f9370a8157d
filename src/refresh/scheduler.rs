//! 刷新调度器模块
//!
//! 按固定间隔拉取配置并原子替换缓存中的快照，失败交给错误处理回调

use crate::cache::{Snapshot, SnapshotCache};
use crate::error::{ConfigClientError, Result};
use crate::refresh::fetcher::ConfigFetcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// 刷新失败回调函数类型
pub type ErrorHandler = Arc<dyn Fn(&ConfigClientError) + Send + Sync>;

/// 默认错误处理：输出到标准错误
///
/// 已安装 tracing 订阅者时走 `error!` 日志，否则直接写标准错误
pub fn default_error_handler() -> ErrorHandler {
    Arc::new(|err: &ConfigClientError| {
        if tracing::dispatcher::has_been_set() {
            error!("config error: {}", err);
        } else {
            eprintln!("config error: {err}");
        }
    })
}

/// 刷新执行器
///
/// 同一时间只允许一次刷新，后开始的刷新不会被先开始的旧结果覆盖
pub struct Refresher {
    /// 配置拉取器
    fetcher: Arc<dyn ConfigFetcher>,
    /// 快照缓存
    cache: Arc<SnapshotCache>,
    /// 刷新互斥
    gate: Mutex<()>,
}

impl Refresher {
    /// 创建新的刷新执行器
    pub fn new(fetcher: Arc<dyn ConfigFetcher>, cache: Arc<SnapshotCache>) -> Self {
        Self {
            fetcher,
            cache,
            gate: Mutex::new(()),
        }
    }

    /// 执行一次刷新
    ///
    /// 成功时发布新快照；失败时缓存保持不变
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        self.fetch_and_commit(|snapshot| Ok(self.cache.install(snapshot))).await
    }

    /// 拉取一次配置，并在刷新互斥内交给 `commit` 决定是否发布
    ///
    /// `commit` 返回错误时快照被丢弃，缓存保持不变
    pub async fn fetch_and_commit<T>(
        &self,
        commit: impl FnOnce(Snapshot) -> Result<T>,
    ) -> Result<T> {
        let _guard = self.gate.lock().await;
        let snapshot = self.fetcher.fetch().await?;
        commit(snapshot)
    }

    /// 快照缓存
    pub fn cache(&self) -> &Arc<SnapshotCache> {
        &self.cache
    }
}

/// 刷新调度器
///
/// 后台任务串行执行刷新，慢请求会推迟下一次触发而不会并发
pub struct RefreshScheduler {
    /// 后台任务句柄
    task: JoinHandle<()>,
    /// 刷新间隔
    period: Duration,
}

impl RefreshScheduler {
    /// 启动刷新任务，第一次触发在一个间隔之后
    ///
    /// # 参数
    /// * `refresher` - 刷新执行器
    /// * `period` - 刷新间隔
    /// * `error_handler` - 刷新失败回调
    pub fn spawn(refresher: Arc<Refresher>, period: Duration, error_handler: ErrorHandler) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!("启动配置刷新任务，间隔: {}ms", period.as_millis());

            loop {
                ticker.tick().await;

                match refresher.refresh().await {
                    Ok(snapshot) => {
                        debug!("配置刷新完成，版本: {}", snapshot.version);
                    }
                    Err(e) => {
                        debug!("配置刷新失败，保留当前快照: {}", e);
                        error_handler(&e);
                    }
                }
            }
        });

        Self { task, period }
    }

    /// 停止刷新任务
    ///
    /// 正在进行的拉取会被丢弃，结果不会写入缓存
    pub fn stop(&self) {
        if !self.task.is_finished() {
            self.task.abort();
            info!("配置刷新任务已停止");
        }
    }

    /// 刷新任务是否仍在运行
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// 刷新间隔
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
