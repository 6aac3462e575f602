mod feed;

pub use self::feed::PostFeed;

use crate::{
    api::ApiResponse,
    config::Credentials,
    model::{Article, ArticlePage},
};

const ARTICLES_PATH: &str = "/api/blog/articles";

/// 客户端错误
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// 服务端返回 `success: false`
    #[error("{0}")]
    Server(String),

    /// 没有拿到结构化响应
    #[error("Network error occurred")]
    Network(#[from] reqwest::Error),
}

/// 一次请求取回的文章
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedPosts {
    pub posts: Vec<Article>,
    pub has_next_page: bool,
    pub end_cursor: String,
}

/// 博客接口客户端
///
/// 只负责请求和解包，累积分页由调用方（如 [`PostFeed`]）完成。
#[derive(Clone)]
pub struct BlogClient {
    client: reqwest::Client,
    endpoint: String,
}

impl BlogClient {
    /// `base_url` 为服务根地址，如 `http://localhost:3001`
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{ARTICLES_PATH}", base_url.as_ref().trim_end_matches('/')),
        }
    }

    /// 获取一页文章
    ///
    /// `credentials` 为空时使用服务端默认店铺。
    pub async fn fetch_blog_posts(
        &self,
        page_size: u32,
        after: Option<&str>,
        credentials: Option<&Credentials>,
    ) -> Result<FetchedPosts, ClientError> {
        let mut params = vec![("limit", page_size.to_string())];
        if let Some(cursor) = after.filter(|c| !c.is_empty()) {
            params.push(("cursor", cursor.to_string()));
        }
        if let Some(credentials) = credentials {
            params.push(("domain", credentials.store_domain.clone()));
            params.push(("token", credentials.access_token.clone()));
            params.push(("version", credentials.api_version.clone()));
        }

        let result: ApiResponse<ArticlePage> = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?
            .json()
            .await?;

        match result {
            ApiResponse {
                success: true,
                data: Some(page),
                ..
            } => Ok(FetchedPosts {
                posts: page.articles,
                has_next_page: page.page_info.has_next_page,
                end_cursor: page.page_info.end_cursor,
            }),
            ApiResponse { error, .. } => {
                let message = error.unwrap_or_else(|| "Failed to fetch blog posts".to_string());
                tracing::error!(%message, "error fetching blog posts");
                Err(ClientError::Server(message))
            }
        }
    }
}
