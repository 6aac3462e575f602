mod articles;
mod export;
mod response;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::instrument;

pub use self::response::ApiResponse;

use crate::{error::Result, state::AppState};

/// 设置应用的路由。
///
/// 将 `/api/blog` 下的文章列表接口和导出接口组合在一起，并绑定应用状态。
pub fn setup_route(app: AppState) -> Router {
    Router::new()
        .nest(
            "/api/blog",
            articles::setup_route().merge(export::setup_route()),
        )
        .with_state(app)
}

/// 启动 HTTP 服务，并使用给定的路由处理请求。
///
/// 在 `0.0.0.0:<port>` 上监听 TCP 连接，并打印启动日志。
#[instrument(name = "http server", skip(router))]
pub async fn run_server_with_router(router: Router, port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;

    tracing::info!("listening on :{port}");

    axum::serve(listener, router).await?;
    Ok(())
}

/// 启动 HTTP 服务，自动设置路由和中间件。
///
/// 1. 生成路由
/// 2. 添加日志、追踪和跨域中间件
/// 3. 启动服务器
pub async fn run_server(app: AppState, port: u16) -> Result<()> {
    let router = setup_route(app);
    let router = add_middlewares(router);
    run_server_with_router(router, port).await
}

/// 为路由添加中间件，包括请求追踪、失败日志记录和跨域。
///
/// 日志记录会在请求失败时输出错误信息。
pub fn add_middlewares(router: Router) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router
        .layer(
            TraceLayer::new_for_http()
                .on_failure(log_failure)
                .on_request(|_req: &_, _span: &tracing::Span| {
                    // 空实现，关闭请求日志
                }),
        )
        .layer(CorsLayer::permissive())
}
