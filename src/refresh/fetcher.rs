//! HTTP配置拉取器实现
//!
//! 发起一次带认证的GET请求并把响应解码为配置快照，不做重试

use crate::cache::snapshot::{decode_snapshot, Snapshot};
use crate::config::ClientConfig;
use crate::error::{ConfigClientError, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tracing::debug;

/// 配置拉取器trait，定义拉取接口
#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    /// 拉取完整的配置快照
    ///
    /// # 返回
    /// * `Result<Snapshot>` - 新快照，传输、状态码和解码错误统一通过错误返回
    async fn fetch(&self) -> Result<Snapshot>;
}

/// HTTP配置拉取器
pub struct HttpConfigFetcher {
    /// HTTP客户端
    client: Client,
    /// 请求地址
    endpoint: String,
    /// 认证头
    authorization: String,
}

impl HttpConfigFetcher {
    /// 创建新的HTTP配置拉取器
    ///
    /// # 参数
    /// * `config` - 客户端配置
    ///
    /// # 返回
    /// * `Result<Self>` - 拉取器实例
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            authorization: format!("bearer {}", config.api_key),
        })
    }

    /// 请求地址
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ConfigFetcher for HttpConfigFetcher {
    async fn fetch(&self) -> Result<Snapshot> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("拉取配置返回异常状态码: {} ({})", status.as_u16(), self.endpoint);
            return Err(ConfigClientError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let snapshot = decode_snapshot(&body)?;

        debug!(
            "拉取配置成功: {} 个键, 耗时 {}ms",
            snapshot.len(),
            start_time.elapsed().as_millis()
        );

        Ok(snapshot)
    }
}
