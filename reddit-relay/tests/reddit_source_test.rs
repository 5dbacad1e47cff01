use reddit_relay::{ContentSource, FetchConfig, Fetcher, Post, RedditSource, RelayError};
use serde_json::json;
use tracing::info;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> Fetcher {
    Fetcher::new(FetchConfig {
        user_agent: "relay-test/1.0".to_string(),
        max_retries: 0,
        retry_delay_seconds: 0,
        ..FetchConfig::default()
    })
    .unwrap()
}

fn listing() -> serde_json::Value {
    json!({
        "kind": "Listing",
        "data": {
            "after": "t3_c3",
            "children": [
                {"kind": "t3", "data": {"id": "a1", "title": "Cute dog", "url": "https://i.redd.it/a1.png", "stickied": false}},
                {"kind": "t3", "data": {"id": "b2", "title": "Sleepy cat", "url": "https://i.imgur.com/b2.gifv"}},
                {"kind": "t3", "data": {"id": "c3", "title": "Video", "url": "https://v.redd.it/c3"}}
            ]
        }
    })
}

#[tokio::test]
async fn test_fetch_top_reads_hot_listing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/aww/hot.json"))
        .and(query_param("limit", "3"))
        .and(header("user-agent", "relay-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&server)
        .await;

    let source = RedditSource::with_base_url(fetcher(), server.uri());
    let posts = source.fetch_top("aww", 3).await.unwrap();
    info!("Fetched {:?}", posts);

    assert_eq!(posts.len(), 3);
    assert_eq!(
        posts[0],
        Post::new("a1", "Cute dog", "https://i.redd.it/a1.png", "https://redd.it/a1")
    );
    assert_eq!(posts[2].id, "c3");
}

#[tokio::test]
async fn test_fetch_top_caps_at_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/aww/hot.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&server)
        .await;

    let source = RedditSource::with_base_url(fetcher(), server.uri());
    let posts = source.fetch_top("aww", 2).await.unwrap();
    assert_eq!(posts.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["a1", "b2"]);
}

#[tokio::test]
async fn test_fetch_top_surfaces_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/private/hot.json"))
        .respond_with(ResponseTemplate::new(403).set_body_string("private"))
        .mount(&server)
        .await;

    let source = RedditSource::with_base_url(fetcher(), server.uri());
    let err = source.fetch_top("private", 5).await.unwrap_err();
    assert!(matches!(err, RelayError::Api { status: 403, .. }));
}
