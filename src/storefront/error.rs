use reqwest::StatusCode;

/// 店铺 GraphQL 调用错误
///
/// - [`GraphqlError::Network`]：没有拿到响应
/// - [`GraphqlError::Upstream`]：接口返回非 2xx
/// - [`GraphqlError::Decode`]：2xx 响应体不是 JSON
#[derive(Debug, thiserror::Error)]
pub enum GraphqlError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storefront API error: {status}. {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("invalid storefront response: {0}")]
    Decode(#[from] serde_json::Error),
}
