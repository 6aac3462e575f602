use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use axum_extra::extract::Query;
use serde::Deserialize;

use super::ApiResponse;
use crate::{
    config::{CredentialOverrides, Credentials, PageLimits},
    error::Result,
    model::ArticlePage,
    state::{Aggregator, AppState},
};

/// 配置文章相关路由。
///
/// - `GET /articles`：分页文章列表
pub fn setup_route() -> Router<AppState> {
    Router::new().route("/articles", get(articles_list))
}

/// 查询参数
///
/// `limit` 按字符串接收，非法值统一走 500 错误外壳而不是提取器的 400。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArticlesParams {
    limit: Option<String>,
    cursor: Option<String>,
    domain: Option<String>,
    token: Option<String>,
    version: Option<String>,
}

impl ArticlesParams {
    fn overrides(&self) -> CredentialOverrides {
        CredentialOverrides {
            domain: self.domain.clone(),
            token: self.token.clone(),
            version: self.version.clone(),
        }
    }
}

/// 获取文章列表。
///
/// 请求中带有 `domain`/`token`/`version` 时只对本次请求生效。
/// 返回 `{success, data: {articles, pageInfo}}`。
async fn articles_list(
    Query(params): Query<ArticlesParams>,
    State(aggregator): State<Arc<Aggregator>>,
    State(defaults): State<Arc<Credentials>>,
    State(limits): State<PageLimits>,
) -> Result<Json<ApiResponse<ArticlePage>>> {
    let credentials = params.overrides().apply(&defaults);
    let page_size = limits.resolve(params.limit.as_deref())?;

    let page = aggregator
        .fetch_articles(&credentials, page_size, params.cursor.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(page)))
}
