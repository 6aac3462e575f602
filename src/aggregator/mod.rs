mod cursor;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::instrument;

pub use self::cursor::BlogCursor;

use crate::{
    config::Credentials,
    model::{Article, ArticlePage, PageInfo},
    storefront::{
        ArticlesData, BlogData, BlogNode, BlogsData, GraphqlError, GraphqlResponse,
        GraphqlTransport, query,
    },
};

/// 聚合错误
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    /// 上游调用失败，消息保持不变
    #[error("{0}")]
    Upstream(#[from] GraphqlError),

    /// 游标无法解析，内容不回显
    #[error("invalid cursor")]
    InvalidCursor,
}

/// 文章集合的查询方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// 直接查询 `articles`，上游排序，游标原样透传
    Flat,
    /// 查询前 `blog_limit` 个博客，每个博客各自分页
    Blogs { blog_limit: u32 },
}

/// 文章聚合器
///
/// 构造后配置不再变化；店铺凭据随每次调用传入，多个请求可以安全共享同一个实例。
pub struct ArticleAggregator<T> {
    transport: T,
    shape: QueryShape,
    max_page_size: u32,
}

impl<T: GraphqlTransport> ArticleAggregator<T> {
    pub fn new(transport: T, shape: QueryShape, max_page_size: u32) -> Self {
        Self {
            transport,
            shape,
            max_page_size: max_page_size.max(1),
        }
    }

    /// 实际发往上游的页大小，限制在 `1..=max_page_size`
    pub fn effective_page_size(&self, requested: u32) -> u32 {
        requested.clamp(1, self.max_page_size)
    }

    /// 获取一页文章
    ///
    /// 空字符串游标视为没有游标。上游没有数据或数据格式不对时返回空页而不是错误。
    #[instrument(
        name = "fetch articles",
        skip(self, credentials, after),
        fields(domain = %credentials.store_domain)
    )]
    pub async fn fetch_articles(
        &self,
        credentials: &Credentials,
        page_size: u32,
        after: Option<&str>,
    ) -> Result<ArticlePage, AggregationError> {
        let first = self.effective_page_size(page_size);
        let after = after.filter(|c| !c.is_empty());

        match self.shape {
            QueryShape::Flat => self.fetch_flat(credentials, first, after).await,
            QueryShape::Blogs { blog_limit } => match after {
                None => self.fetch_blogs(credentials, blog_limit, first).await,
                Some(token) => {
                    let cursor = BlogCursor::decode(token)?;
                    self.fetch_blogs_after(credentials, first, &cursor).await
                }
            },
        }
    }

    /// 从第一页开始顺序翻页直到没有下一页，最多 `max_pages` 页
    pub async fn fetch_all(
        &self,
        credentials: &Credentials,
        page_size: u32,
        max_pages: usize,
    ) -> Result<Vec<Article>, AggregationError> {
        let mut articles = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..max_pages {
            let page = self
                .fetch_articles(credentials, page_size, cursor.as_deref())
                .await?;
            articles.extend(page.articles);

            match page.page_info.next_cursor() {
                Some(next) => cursor = Some(next.to_string()),
                None => return Ok(articles),
            }
        }

        tracing::warn!(max_pages, "page limit reached, result truncated");
        Ok(articles)
    }

    async fn fetch_flat(
        &self,
        credentials: &Credentials,
        first: u32,
        after: Option<&str>,
    ) -> Result<ArticlePage, AggregationError> {
        let value = self
            .transport
            .execute(
                credentials,
                query::ARTICLES_QUERY,
                json!({ "first": first, "after": after }),
            )
            .await?;

        let Some(connection) = decode::<ArticlesData>(value).and_then(|d| d.articles) else {
            return Ok(ArticlePage::empty());
        };
        if connection.edges.is_empty() {
            return Ok(ArticlePage::empty());
        }

        Ok(ArticlePage {
            articles: connection
                .edges
                .into_iter()
                .map(|edge| edge.node.into_article(None))
                .collect(),
            page_info: connection.page_info.into(),
        })
    }

    async fn fetch_blogs(
        &self,
        credentials: &Credentials,
        blog_limit: u32,
        first: u32,
    ) -> Result<ArticlePage, AggregationError> {
        let value = self
            .transport
            .execute(
                credentials,
                query::BLOGS_QUERY,
                json!({ "blogs": blog_limit, "first": first }),
            )
            .await?;

        let blogs = decode::<BlogsData>(value)
            .and_then(|d| d.blogs)
            .map(|c| c.edges.into_iter().map(|edge| edge.node).collect())
            .unwrap_or_default();

        Ok(merge_blogs(blogs))
    }

    /// 每个还有剩余页的博客按自己的游标再查一次，逐个顺序请求
    async fn fetch_blogs_after(
        &self,
        credentials: &Credentials,
        first: u32,
        cursor: &BlogCursor,
    ) -> Result<ArticlePage, AggregationError> {
        let mut blogs = Vec::new();

        for (blog_id, after) in cursor.iter() {
            let value = self
                .transport
                .execute(
                    credentials,
                    query::BLOG_ARTICLES_QUERY,
                    json!({ "id": blog_id, "first": first, "after": after }),
                )
                .await?;

            match decode::<BlogData>(value).and_then(|d| d.blog) {
                Some(blog) => blogs.push(blog),
                None => tracing::warn!(blog_id, "blog missing from storefront response"),
            }
        }

        Ok(merge_blogs(blogs))
    }
}

/// 解析 GraphQL 响应的 `data`，格式不对时记录日志并返回 `None`
fn decode<D: DeserializeOwned>(value: Value) -> Option<D> {
    match serde_json::from_value::<GraphqlResponse<D>>(value) {
        Ok(resp) => {
            for error in &resp.errors {
                tracing::warn!(message = %error.message, "storefront graphql error");
            }
            resp.data
        }
        Err(e) => {
            tracing::warn!(%e, "malformed storefront payload");
            None
        }
    }
}

/// 展开各博客的文章并按发布时间倒序排列，同时生成合成游标
fn merge_blogs(blogs: Vec<BlogNode>) -> ArticlePage {
    let mut cursor = BlogCursor::default();
    let mut articles = Vec::new();

    for BlogNode {
        id,
        title,
        articles: connection,
    } in blogs
    {
        cursor.track(
            &id,
            connection.page_info.has_next_page,
            connection.page_info.end_cursor,
        );
        articles.extend(
            connection
                .edges
                .into_iter()
                .map(|edge| edge.node.into_article(Some(&title))),
        );
    }

    if articles.is_empty() {
        return ArticlePage::empty();
    }

    // 单个博客内有序不代表跨博客有序
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    ArticlePage {
        articles,
        page_info: PageInfo::new(!cursor.is_empty(), cursor.encode()),
    }
}
