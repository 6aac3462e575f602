use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::Query;
use serde::Deserialize;

use crate::{
    config::{CredentialOverrides, Credentials, PageLimits},
    error::Result,
    export::ExportFormat,
    state::{Aggregator, AppState},
};

/// 配置导出路由。
///
/// - `GET /export?format=jsonl|txt`：翻完所有页后返回下载文件
pub fn setup_route() -> Router<AppState> {
    Router::new().route("/export", get(export_articles))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportParams {
    format: Option<String>,
    limit: Option<String>,
    domain: Option<String>,
    token: Option<String>,
    version: Option<String>,
}

impl ExportParams {
    fn overrides(&self) -> CredentialOverrides {
        CredentialOverrides {
            domain: self.domain.clone(),
            token: self.token.clone(),
            version: self.version.clone(),
        }
    }
}

async fn export_articles(
    Query(params): Query<ExportParams>,
    State(aggregator): State<Arc<Aggregator>>,
    State(defaults): State<Arc<Credentials>>,
    State(limits): State<PageLimits>,
) -> Result<impl IntoResponse> {
    let format: ExportFormat = params.format.as_deref().unwrap_or("jsonl").parse()?;
    let credentials = params.overrides().apply(&defaults);
    let page_size = limits.resolve(params.limit.as_deref())?;

    let articles = aggregator
        .fetch_all(&credentials, page_size, limits.max_export_pages)
        .await?;
    tracing::info!(count = articles.len(), %format, "articles exported");

    let body = format.render(&articles)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        format.file_name(&credentials.store_domain)
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
