use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    aggregator::ArticleAggregator,
    config::{Config, Credentials, PageLimits},
    storefront::StorefrontClient,
};

/// 处理请求使用的聚合器类型
pub type Aggregator = ArticleAggregator<StorefrontClient>;

/// 应用程序上下文
///
/// [`AppState`] 只持有不可变的配置和聚合器，请求之间不共享可变状态。
/// 单次请求的店铺凭据由默认凭据和请求参数合并得到，不会写回这里。
#[derive(Clone, FromRef)]
pub struct AppState {
    aggregator: Arc<Aggregator>,
    defaults: Arc<Credentials>,
    limits: PageLimits,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(aggregator: Aggregator, defaults: Credentials, limits: PageLimits) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            defaults: Arc::new(defaults),
            limits,
        }
    }

    /// 根据进程配置创建
    pub fn from_config(config: &Config, client: StorefrontClient) -> Self {
        Self::new(
            ArticleAggregator::new(client, config.query_shape, config.limits.max_page_size),
            config.credentials.clone(),
            config.limits,
        )
    }

    /// 获取文章聚合器
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// 获取默认店铺凭据
    pub fn defaults(&self) -> &Credentials {
        &self.defaults
    }

    /// 获取分页限制
    pub fn limits(&self) -> PageLimits {
        self.limits
    }
}
