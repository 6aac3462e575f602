use std::future::Future;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use super::GraphqlError;
use crate::config::Credentials;

pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// GraphQL 调用接口
///
/// 凭据随每次调用传入，实现方不保存任何店铺配置。
pub trait GraphqlTransport: Send + Sync {
    fn execute(
        &self,
        credentials: &Credentials,
        query: &str,
        variables: Value,
    ) -> impl Future<Output = Result<Value, GraphqlError>> + Send;
}

/// 基于 reqwest 的店铺 GraphQL 客户端
///
/// 单次请求，不重试，超时沿用底层默认值。
#[derive(Clone)]
pub struct StorefrontClient {
    client: reqwest::Client,
}

impl Default for StorefrontClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StorefrontClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers({
                let mut header = HeaderMap::new();
                header.insert(
                    header::ACCEPT,
                    HeaderValue::from_static("application/json"),
                );
                header
            })
            .build()
            .expect("Failed to build reqwest client");

        Self { client }
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    variables: Value,
}

impl GraphqlTransport for StorefrontClient {
    /// 发送 `{query, variables}`，返回解析后的 JSON 响应体
    async fn execute(
        &self,
        credentials: &Credentials,
        query: &str,
        variables: Value,
    ) -> Result<Value, GraphqlError> {
        let resp = self
            .client
            .post(credentials.endpoint())
            .header(ACCESS_TOKEN_HEADER, &credentials.access_token)
            .json(&RequestBody { query, variables })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GraphqlError::Upstream { status, body });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
