use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Response, StatusCode, header},
};
use httpmock::prelude::*;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use blogfeed::{
    aggregator::{ArticleAggregator, QueryShape},
    api,
    client::{BlogClient, PostFeed},
    config::{Credentials, PageLimits},
    state::AppState,
    storefront::StorefrontClient,
};

struct TestApp {
    router: Router,
}

impl TestApp {
    /// 默认店铺指向给定的假上游
    fn new(upstream: &MockServer) -> Self {
        Self::with_shape(upstream, QueryShape::Flat)
    }

    fn with_shape(upstream: &MockServer, shape: QueryShape) -> Self {
        let aggregator = ArticleAggregator::new(StorefrontClient::new(), shape, 50);
        let app = AppState::new(
            aggregator,
            Credentials::new(upstream.base_url(), "default-token"),
            PageLimits::default(),
        );

        Self {
            router: api::setup_route(app),
        }
    }

    async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot fail")
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::get(uri).body(Body::empty()).expect("请求失败");
        let resp = self.request(req).await;
        let status = resp.status();
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        (status, serde_json::from_slice(&data).expect("反序列化失败"))
    }
}

fn article_node(id: &str, published_at: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Title {id}"),
        "excerpt": "kısa",
        "content": format!("<p>{id}</p>"),
        "publishedAt": published_at,
        "image": { "url": "https://cdn.example.com/a.png", "altText": null },
        "author": { "name": "Ayşe" },
        "blog": { "title": "News" }
    })
}

fn articles_payload(nodes: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "data": {
            "articles": {
                "edges": nodes.into_iter().map(|n| json!({ "node": n })).collect::<Vec<_>>(),
                "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next }
            }
        }
    })
}

fn blog_node(id: &str, title: &str, nodes: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": title,
        "articles": {
            "edges": nodes.into_iter().map(|n| json!({ "node": n })).collect::<Vec<_>>(),
            "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next }
        }
    })
}

/// 在随机端口上启动服务，返回根地址
async fn spawn_server(app: TestApp) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("绑定端口失败");
    let addr = listener.local_addr().expect("获取地址失败");
    tokio::spawn(async move {
        axum::serve(listener, app.router).await.expect("服务启动失败");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_list_articles_envelope() {
    let upstream = MockServer::start_async().await;
    let mock = upstream
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/2024-01/graphql.json")
                .header("x-shopify-storefront-access-token", "default-token")
                .json_body_partial(r#"{ "variables": { "first": 20 } }"#);
            then.status(200).json_body(articles_payload(
                vec![article_node("1", "2024-02-01T00:00:00Z")],
                Some("cursor-1"),
            ));
        })
        .await;

    let app = TestApp::new(&upstream);
    let (status, body) = app.get("/api/blog/articles").await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["articles"][0]["id"], "1");
    assert_eq!(body["data"]["articles"][0]["publishedAt"], "2024-02-01T00:00:00Z");
    assert_eq!(body["data"]["articles"][0]["blog"]["title"], "News");
    assert_eq!(
        body["data"]["pageInfo"],
        json!({ "hasNextPage": true, "endCursor": "cursor-1" })
    );
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_limit_is_capped_and_cursor_forwarded() {
    let upstream = MockServer::start_async().await;
    let mock = upstream
        .mock_async(|when, then| {
            when.method(POST)
                .json_body_partial(r#"{ "variables": { "first": 50, "after": "abc" } }"#);
            then.status(200).json_body(articles_payload(vec![], None));
        })
        .await;

    let app = TestApp::new(&upstream);
    let (status, body) = app.get("/api/blog/articles?limit=500&cursor=abc").await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "articles": [], "pageInfo": { "hasNextPage": false, "endCursor": "" } })
    );
}

#[tokio::test]
async fn test_upstream_failure_becomes_500_envelope() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(POST);
            then.status(401).body("[API] Invalid API key or access token");
        })
        .await;

    let app = TestApp::new(&upstream);
    let (status, body) = app.get("/api/blog/articles").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    let message = body["error"].as_str().expect("应当有错误信息");
    assert!(message.contains("401 Unauthorized"), "{message}");
    assert!(message.contains("Invalid API key"), "{message}");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_invalid_limit_uses_error_envelope() {
    let upstream = MockServer::start_async().await;
    let app = TestApp::new(&upstream);
    let (status, body) = app.get("/api/blog/articles?limit=lots").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_request_credentials_only_affect_that_request() {
    let default_upstream = MockServer::start_async().await;
    let other_upstream = MockServer::start_async().await;

    let default_mock = default_upstream
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/2024-01/graphql.json")
                .header("x-shopify-storefront-access-token", "default-token");
            then.status(200).json_body(articles_payload(
                vec![article_node("default", "2024-01-01T00:00:00Z")],
                None,
            ));
        })
        .await;
    let other_mock = other_upstream
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/2024-04/graphql.json")
                .header("x-shopify-storefront-access-token", "other-token");
            then.status(200).json_body(articles_payload(
                vec![article_node("other", "2024-01-01T00:00:00Z")],
                None,
            ));
        })
        .await;

    let app = TestApp::new(&default_upstream);

    let uri = format!(
        "/api/blog/articles?domain={}&token=other-token&version=2024-04",
        other_upstream.base_url()
    );
    let (_, overridden) = app.get(&uri).await;
    assert_eq!(overridden["data"]["articles"][0]["id"], "other");

    // 覆盖项不会残留到后续请求
    let (_, fallback) = app.get("/api/blog/articles").await;
    assert_eq!(fallback["data"]["articles"][0]["id"], "default");

    other_mock.assert_async().await;
    default_mock.assert_async().await;
}

#[tokio::test]
async fn test_export_walks_all_pages() {
    let upstream = MockServer::start_async().await;
    let first = upstream
        .mock_async(|when, then| {
            when.method(POST).body_contains(r#""after":null"#);
            then.status(200).json_body(articles_payload(
                vec![article_node("1", "2024-02-01T00:00:00Z")],
                Some("c1"),
            ));
        })
        .await;
    let second = upstream
        .mock_async(|when, then| {
            when.method(POST).body_contains(r#""after":"c1""#);
            then.status(200).json_body(articles_payload(
                vec![article_node("2", "2024-01-01T00:00:00Z")],
                None,
            ));
        })
        .await;

    let app = TestApp::new(&upstream);
    let req = Request::get("/api/blog/export?format=jsonl")
        .body(Body::empty())
        .expect("请求失败");
    let resp = app.request(req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/x-jsonlines"
    );
    let disposition = resp.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("非法响应头")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"blog-posts-http---127-0-0-1-"));
    assert!(disposition.ends_with(".jsonl\""));

    let data = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("读取数据失败");
    let text = String::from_utf8(data.to_vec()).expect("读取数据失败");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        r#"{"messages":[{"role":"user","content":"Title 1"},{"role":"assistant","content":"<p>1</p>"}]}"#
    );

    first.assert_hits_async(1).await;
    second.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_client_feed_loads_every_page_through_server() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(POST).body_contains(r#""after":null"#);
            then.status(200).json_body(articles_payload(
                vec![
                    article_node("1", "2024-03-01T00:00:00Z"),
                    article_node("2", "2024-02-01T00:00:00Z"),
                ],
                Some("c2"),
            ));
        })
        .await;
    upstream
        .mock_async(|when, then| {
            when.method(POST).body_contains(r#""after":"c2""#);
            then.status(200).json_body(articles_payload(
                vec![article_node("3", "2024-01-01T00:00:00Z")],
                None,
            ));
        })
        .await;

    let client = BlogClient::new(spawn_server(TestApp::new(&upstream)).await);
    let mut feed = PostFeed::new();
    feed.load_all(&client, 2, None).await.expect("请求应当成功");

    let ids: Vec<&str> = feed.posts().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert!(!feed.has_next_page());
    assert_eq!(feed.end_cursor(), None);
}

#[tokio::test]
async fn test_grouped_blogs_sorted_and_cursor_round_trips() {
    let upstream = MockServer::start_async().await;
    let first = upstream
        .mock_async(|when, then| {
            when.method(POST)
                .json_body_partial(r#"{ "variables": { "blogs": 3, "first": 2 } }"#);
            then.status(200).json_body(json!({
                "data": {
                    "blogs": {
                        "edges": [
                            { "node": blog_node(
                                "gid://shopify/Blog/1",
                                "News",
                                vec![
                                    article_node("a1", "2024-03-01T00:00:00Z"),
                                    article_node("a2", "2024-01-01T00:00:00Z"),
                                ],
                                Some("a&next=1"),
                            ) },
                            { "node": blog_node(
                                "gid://shopify/Blog/2",
                                "Guides",
                                vec![article_node("b1", "2024-02-01T00:00:00Z")],
                                None,
                            ) }
                        ]
                    }
                }
            }));
        })
        .await;
    let follow_up = upstream
        .mock_async(|when, then| {
            when.method(POST).json_body_partial(
                r#"{ "variables": { "id": "gid://shopify/Blog/1", "first": 2, "after": "a&next=1" } }"#,
            );
            then.status(200).json_body(json!({
                "data": {
                    "blog": blog_node(
                        "gid://shopify/Blog/1",
                        "News",
                        vec![article_node("a3", "2023-12-01T00:00:00Z")],
                        None,
                    )
                }
            }));
        })
        .await;

    let app = TestApp::with_shape(&upstream, QueryShape::Blogs { blog_limit: 3 });
    let (status, body) = app.get("/api/blog/articles?limit=2").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]["articles"]
        .as_array()
        .expect("应当有文章列表")
        .iter()
        .map(|a| a["id"].as_str().expect("缺少 id"))
        .collect();
    assert_eq!(ids, vec!["a1", "b1", "a2"]);
    assert_eq!(body["data"]["articles"][1]["blog"]["title"], "Guides");
    assert_eq!(body["data"]["pageInfo"]["hasNextPage"], true);
    let cursor = body["data"]["pageInfo"]["endCursor"]
        .as_str()
        .expect("应当有游标")
        .to_string();

    // 游标经查询参数编码后原样回到服务端，只继续还有剩余页的博客
    let client = BlogClient::new(spawn_server(app).await);
    let next = client
        .fetch_blog_posts(2, Some(&cursor), None)
        .await
        .expect("请求应当成功");

    let ids: Vec<&str> = next.posts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a3"]);
    assert!(!next.has_next_page);
    assert_eq!(next.end_cursor, "");

    first.assert_hits_async(1).await;
    follow_up.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_grouped_invalid_cursor_uses_error_envelope() {
    let upstream = MockServer::start_async().await;
    let any = upstream
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "data": null }));
        })
        .await;

    let app = TestApp::with_shape(&upstream, QueryShape::Blogs { blog_limit: 3 });
    let (status, body) = app
        .get("/api/blog/articles?cursor=%7B%22broken%22%3A")
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid cursor");
    any.assert_hits_async(0).await;
}
