//! 店铺接口的响应结构，只用于反序列化。

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::{Article, ArticleAuthor, ArticleImage, BlogRef, PageInfo};

/// GraphQL 响应外壳
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlErrorMessage {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: UpstreamPageInfo,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// 上游分页信息，没有数据时 `endCursor` 可能为 `null`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl From<UpstreamPageInfo> for PageInfo {
    fn from(info: UpstreamPageInfo) -> Self {
        PageInfo::new(info.has_next_page, info.end_cursor.unwrap_or_default())
    }
}

/// 文章节点
///
/// 按博客分组查询时节点内没有 `blog` 字段，由外层博客注入。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleNode {
    pub id: String,
    pub title: String,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub image: Option<ArticleImage>,
    pub author: Option<ArticleAuthor>,
    pub blog: Option<BlogRef>,
}

impl ArticleNode {
    /// 转换为 [`Article`]，节点本身没有博客信息时使用 `blog_title`
    pub fn into_article(self, blog_title: Option<&str>) -> Article {
        let blog = match (self.blog, blog_title) {
            (_, Some(title)) => BlogRef {
                title: title.to_string(),
            },
            (Some(blog), None) => blog,
            (None, None) => BlogRef {
                title: String::new(),
            },
        };

        Article {
            id: self.id,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            published_at: self.published_at,
            image: self.image,
            author: self.author,
            blog,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BlogNode {
    pub id: String,
    pub title: String,
    pub articles: Connection<ArticleNode>,
}

/// `articles(...)` 查询的 `data`
#[derive(Debug, Deserialize)]
pub struct ArticlesData {
    pub articles: Option<Connection<ArticleNode>>,
}

/// `blogs(...)` 查询的 `data`
#[derive(Debug, Deserialize)]
pub struct BlogsData {
    pub blogs: Option<Connection<BlogNode>>,
}

/// `blog(id: ...)` 查询的 `data`
#[derive(Debug, Deserialize)]
pub struct BlogData {
    pub blog: Option<BlogNode>,
}
