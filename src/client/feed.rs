use super::{BlogClient, ClientError, FetchedPosts};
use crate::{config::Credentials, model::Article};

/// 调用方持有的文章列表
///
/// 第一页替换列表，之后的"加载更多"追加到末尾。请求严格顺序执行。
#[derive(Debug, Default)]
pub struct PostFeed {
    posts: Vec<Article>,
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl PostFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Article] {
        &self.posts
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn end_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref()
    }

    /// 合并一页结果，`replace` 为 `true` 时替换已有列表
    pub fn apply(&mut self, fetched: FetchedPosts, replace: bool) {
        if replace {
            self.posts = fetched.posts;
        } else {
            self.posts.extend(fetched.posts);
        }
        self.has_next_page = fetched.has_next_page;
        self.end_cursor = Some(fetched.end_cursor).filter(|c| !c.is_empty());
    }

    /// 重新获取第一页
    pub async fn refresh(
        &mut self,
        client: &BlogClient,
        page_size: u32,
        credentials: Option<&Credentials>,
    ) -> Result<(), ClientError> {
        let fetched = client.fetch_blog_posts(page_size, None, credentials).await?;
        self.apply(fetched, true);
        Ok(())
    }

    /// 加载下一页
    ///
    /// 没有下一页或没有游标时什么也不做并返回 `false`。
    pub async fn load_more(
        &mut self,
        client: &BlogClient,
        page_size: u32,
        credentials: Option<&Credentials>,
    ) -> Result<bool, ClientError> {
        let Some(cursor) = self.end_cursor.clone().filter(|_| self.has_next_page) else {
            return Ok(false);
        };

        let fetched = client
            .fetch_blog_posts(page_size, Some(&cursor), credentials)
            .await?;
        self.apply(fetched, false);
        Ok(true)
    }

    /// 从第一页开始加载到最后一页
    pub async fn load_all(
        &mut self,
        client: &BlogClient,
        page_size: u32,
        credentials: Option<&Credentials>,
    ) -> Result<(), ClientError> {
        self.refresh(client, page_size, credentials).await?;
        while self.load_more(client, page_size, credentials).await? {}
        Ok(())
    }
}
