//! GraphQL 查询语句

/// 平铺查询：按发布时间倒序取文章
pub const ARTICLES_QUERY: &str = r#"
query GetArticles($first: Int!, $after: String) {
  articles(first: $first, after: $after, sortKey: PUBLISHED_AT, reverse: true) {
    edges {
      node {
        id
        title
        excerpt
        content
        publishedAt
        image { url altText }
        author { name }
        blog { title }
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}
"#;

/// 分组查询首页：取前 `$blogs` 个博客，每个博客各取一页文章
pub const BLOGS_QUERY: &str = r#"
query GetBlogArticles($blogs: Int!, $first: Int!) {
  blogs(first: $blogs) {
    edges {
      node {
        id
        title
        articles(first: $first, sortKey: PUBLISHED_AT, reverse: true) {
          edges {
            node {
              id
              title
              excerpt
              content
              publishedAt
              image { url altText }
              author { name }
            }
          }
          pageInfo { hasNextPage endCursor }
        }
      }
    }
  }
}
"#;

/// 分组查询后续页：单个博客从自己的游标继续
pub const BLOG_ARTICLES_QUERY: &str = r#"
query GetBlogArticlesAfter($id: ID!, $first: Int!, $after: String) {
  blog(id: $id) {
    id
    title
    articles(first: $first, after: $after, sortKey: PUBLISHED_AT, reverse: true) {
      edges {
        node {
          id
          title
          excerpt
          content
          publishedAt
          image { url altText }
          author { name }
        }
      }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;
