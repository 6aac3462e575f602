pub mod aggregator;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod state;
pub mod storefront;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use crate::{config::Config, error::Result, state::AppState, storefront::StorefrontClient};

/// 初始化日志，读取环境变量配置并启动 HTTP 服务
///
/// 缺少必要配置时直接返回 [`error::Error::Configuration`]。
pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("BLOGFEED_LOG"))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        domain = %config.credentials.store_domain,
        api_version = %config.credentials.api_version,
        shape = ?config.query_shape,
        "configuration loaded"
    );

    let app = AppState::from_config(&config, StorefrontClient::new());

    api::run_server(app, config.port).await
}
