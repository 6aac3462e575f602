use std::collections::BTreeMap;

use super::AggregationError;

/// 分组查询的合成游标
///
/// 记录每个还有下一页的博客各自的 `endCursor`，已翻完的博客不在其中。
/// 对调用方而言是不透明字符串。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogCursor(BTreeMap<String, String>);

impl BlogCursor {
    /// 记录博客的下一页游标，没有下一页时忽略
    pub fn track(&mut self, blog_id: &str, has_next_page: bool, end_cursor: Option<String>) {
        if let Some(cursor) = end_cursor.filter(|c| has_next_page && !c.is_empty()) {
            self.0.insert(blog_id.to_string(), cursor);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按博客 id 顺序遍历 `(blog_id, cursor)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 编码为游标字符串，没有剩余页时为空串
    pub fn encode(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    pub fn decode(token: &str) -> Result<Self, AggregationError> {
        serde_json::from_str(token)
            .map(Self)
            .map_err(|_| AggregationError::InvalidCursor)
    }
}
