use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 文章
///
/// 从店铺 GraphQL 接口取回后只在内存中传递，不做任何本地持久化。
/// 字段名按 camelCase 序列化，与前端约定保持一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// 文章唯一标识
    pub id: String,
    /// 标题
    pub title: String,
    /// 摘要
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// 正文，HTML 格式
    pub content: String,
    /// 发布时间
    pub published_at: DateTime<Utc>,
    /// 封面图
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ArticleImage>,
    /// 作者
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<ArticleAuthor>,
    /// 所属博客
    pub blog: BlogRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAuthor {
    pub name: String,
}

/// 文章所属博客的引用，只保留标题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogRef {
    pub title: String,
}

/// 分页信息
///
/// `has_next_page` 为 `false` 时 `end_cursor` 不可再用于请求下一页，
/// 通过 [`PageInfo::next_cursor`] 取游标可以保证这一点。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: String,
}

impl PageInfo {
    /// 最后一页：`{hasNextPage: false, endCursor: ""}`
    pub fn last() -> Self {
        Self::default()
    }

    pub fn new(has_next_page: bool, end_cursor: impl Into<String>) -> Self {
        Self {
            has_next_page,
            end_cursor: end_cursor.into(),
        }
    }

    /// 下一页游标，没有下一页或游标为空时返回 `None`
    pub fn next_cursor(&self) -> Option<&str> {
        (self.has_next_page && !self.end_cursor.is_empty()).then_some(self.end_cursor.as_str())
    }
}

/// 一页文章及其分页信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub page_info: PageInfo,
}

impl ArticlePage {
    /// 空结果，没有下一页
    pub fn empty() -> Self {
        Self::default()
    }
}
