//! 配置客户端
//!
//! 管理客户端生命周期（创建、启动、停止），并提供带类型的配置读取接口

use crate::cache::{ConfigValue, Snapshot, SnapshotCache};
use crate::config::{validate_config, ClientConfig};
use crate::error::{ConfigClientError, ConfigError, Result};
use crate::refresh::{
    default_error_handler, ConfigFetcher, ErrorHandler, HttpConfigFetcher, RefreshScheduler,
    Refresher,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// 客户端生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// 已创建，尚未成功启动
    Created,
    /// 已启动，后台刷新运行中
    Started,
    /// 已停止，不能再次启动
    Stopped,
}

/// 配置读取结果
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// 尚未完成首次拉取
    NotReady,
    /// 找到且类型匹配
    Found(T),
    /// 键不存在或类型不匹配
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_ready(&self) -> bool {
        !matches!(self, Lookup::NotReady)
    }

    /// 转换为 `Option`，未就绪和未找到都返回 `None`
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::NotReady => Lookup::NotReady,
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.found().unwrap_or(default)
    }
}

impl<T: Default> Lookup<T> {
    /// 转换为 `(值, 是否找到)`，未找到时值为类型默认值
    pub fn into_pair(self) -> (T, bool) {
        match self {
            Lookup::Found(value) => (value, true),
            _ => (T::default(), false),
        }
    }
}

/// 生命周期内部状态
enum Lifecycle {
    Created,
    Started(RefreshScheduler),
    Stopped,
}

/// 远程配置客户端
///
/// 客户端被丢弃时后台刷新任务随之中止
pub struct ConfigClient {
    /// 客户端配置
    config: ClientConfig,
    /// 刷新执行器
    refresher: Arc<Refresher>,
    /// 刷新失败回调
    error_handler: ErrorHandler,
    /// 生命周期
    lifecycle: Mutex<Lifecycle>,
}

impl ConfigClient {
    /// 使用默认设置创建客户端
    ///
    /// # 参数
    /// * `api_key` - API密钥
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// 使用指定配置创建客户端
    ///
    /// # 参数
    /// * `config` - 客户端配置，创建前会先验证
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        validate_config(&config).map_err(ConfigError::ValidationError)?;
        let fetcher = HttpConfigFetcher::new(&config)?;
        Ok(Self::assemble(config, Arc::new(fetcher)))
    }

    /// 使用自定义拉取器创建客户端
    ///
    /// 配置同样要通过验证，刷新间隔为零会被拒绝
    pub fn with_fetcher(config: ClientConfig, fetcher: Arc<dyn ConfigFetcher>) -> Result<Self> {
        validate_config(&config).map_err(ConfigError::ValidationError)?;
        Ok(Self::assemble(config, fetcher))
    }

    fn assemble(config: ClientConfig, fetcher: Arc<dyn ConfigFetcher>) -> Self {
        let cache = Arc::new(SnapshotCache::new());
        Self {
            config,
            refresher: Arc::new(Refresher::new(fetcher, cache)),
            error_handler: default_error_handler(),
            lifecycle: Mutex::new(Lifecycle::Created),
        }
    }

    /// 设置刷新失败回调
    ///
    /// 未设置时使用 [`default_error_handler`]：进程已安装 tracing 订阅者时
    /// 以 `error!` 级别记录，否则直接写到标准错误
    pub fn with_error_handler(
        mut self,
        handler: impl Fn(&ConfigClientError) + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    /// 客户端配置
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 当前生命周期状态
    pub fn state(&self) -> ClientState {
        match *self.lifecycle() {
            Lifecycle::Created => ClientState::Created,
            Lifecycle::Started(_) => ClientState::Started,
            Lifecycle::Stopped => ClientState::Stopped,
        }
    }

    /// 是否已完成首次成功拉取
    pub fn is_ready(&self) -> bool {
        self.refresher.cache().is_ready()
    }

    /// 启动客户端
    ///
    /// 先同步拉取一次配置，成功后启动后台刷新；失败时保持未启动、未就绪
    ///
    /// 首次拉取期间调用了 `stop()` 时返回 `Stopped`，拉取到的快照不会发布
    pub async fn start(&self) -> Result<()> {
        self.ensure_startable()?;

        let snapshot = self
            .refresher
            .fetch_and_commit(|snapshot| {
                let mut lifecycle = self.lifecycle();
                match *lifecycle {
                    Lifecycle::Created => {}
                    Lifecycle::Started(_) => return Err(ConfigClientError::AlreadyStarted),
                    Lifecycle::Stopped => return Err(ConfigClientError::Stopped),
                }

                let snapshot = self.refresher.cache().install(snapshot);
                let scheduler = RefreshScheduler::spawn(
                    Arc::clone(&self.refresher),
                    self.config.refresh_interval(),
                    Arc::clone(&self.error_handler),
                );
                *lifecycle = Lifecycle::Started(scheduler);
                Ok(snapshot)
            })
            .await?;

        info!(
            "配置客户端已启动: {}, 快照版本: {}, 键数量: {}",
            self.config.endpoint(),
            snapshot.version,
            snapshot.len()
        );
        Ok(())
    }

    /// 停止后台刷新
    ///
    /// 可重复调用；停止后仍可读取最后一次成功拉取的快照
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.lifecycle(), Lifecycle::Stopped);
        match previous {
            Lifecycle::Started(scheduler) => {
                scheduler.stop();
                info!("配置客户端已停止");
            }
            Lifecycle::Created => debug!("配置客户端未启动即停止"),
            Lifecycle::Stopped => {}
        }
    }

    /// 立即执行一次刷新
    ///
    /// 错误直接返回给调用者，不经过错误处理回调
    pub async fn refresh_now(&self) -> Result<Arc<Snapshot>> {
        if matches!(*self.lifecycle(), Lifecycle::Stopped) {
            return Err(ConfigClientError::Stopped);
        }
        self.refresher.refresh().await
    }

    /// 当前快照，首次拉取成功前为 `None`
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.refresher.cache().load()
    }

    /// 读取原始配置值
    pub fn get(&self, key: &str) -> Lookup<ConfigValue> {
        self.lookup(key, |value| Some(value.clone()))
    }

    /// 读取布尔值
    pub fn get_bool(&self, key: &str) -> Lookup<bool> {
        self.lookup(key, ConfigValue::as_bool)
    }

    /// 读取字符串值
    pub fn get_string(&self, key: &str) -> Lookup<String> {
        self.lookup(key, |value| value.as_str().map(str::to_owned))
    }

    /// 读取浮点数值
    pub fn get_f64(&self, key: &str) -> Lookup<f64> {
        self.lookup(key, ConfigValue::as_f64)
    }

    /// 读取整数值
    pub fn get_i64(&self, key: &str) -> Lookup<i64> {
        self.lookup(key, ConfigValue::as_i64)
    }

    fn lookup<T>(&self, key: &str, narrow: impl FnOnce(&ConfigValue) -> Option<T>) -> Lookup<T> {
        let Some(snapshot) = self.refresher.cache().load() else {
            return Lookup::NotReady;
        };

        match snapshot.get(key).and_then(narrow) {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotFound,
        }
    }

    fn ensure_startable(&self) -> Result<()> {
        match *self.lifecycle() {
            Lifecycle::Created => Ok(()),
            Lifecycle::Started(_) => Err(ConfigClientError::AlreadyStarted),
            Lifecycle::Stopped => Err(ConfigClientError::Stopped),
        }
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
