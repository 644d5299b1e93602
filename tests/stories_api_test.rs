//! End-to-end: router → service → aggregator → reqwest client → wiremock upstream.

use axum::http::StatusCode;
use axum_test::TestServer;
use hnfeed::app::AppState;
use hnfeed::app::router::api_router;
use hnfeed::config::Settings;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(upstream: &MockServer) -> Settings {
    Settings {
        hacker_news_api_url: format!("{}/v0/", upstream.uri()),
        http_port: 5000,
        story_limit: 200,
        cache_ttl_secs: 600,
        require_url: true,
        empty_as_not_found: true,
        upstream_timeout_secs: 5,
    }
}

fn server_for(settings: &Settings) -> TestServer {
    let state = AppState::from_settings(settings).unwrap();
    TestServer::new(api_router(state.stories)).unwrap()
}

async fn mount_item(upstream: &MockServer, id: u64, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v0/item/{id}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(upstream)
        .await;
}

async fn mount_ids(upstream: &MockServer, ids: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v0/newstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ids))
        .expect(expected_calls)
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn test_aggregates_valid_stories_and_drops_bad_items() {
    let upstream = MockServer::start().await;
    mount_ids(&upstream, json!([1, 2, 3, 4]), 1).await;
    mount_item(
        &upstream,
        1,
        json!({"id": 1, "by": "a", "title": "First Story", "type": "story", "url": "https://one.example"}),
    )
    .await;
    mount_item(&upstream, 2, Value::Null).await;
    Mock::given(method("GET"))
        .and(path("/v0/item/3.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;
    mount_item(
        &upstream,
        4,
        json!({"id": 4, "by": "b", "title": "Ask HN: no link", "type": "story"}),
    )
    .await;

    let server = server_for(&settings_for(&upstream));

    let response = server.get("/api/stories").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["items"][0]["title"], "First Story");

    // Second request is served from cache; `expect(1)` is verified on drop.
    server.get("/api/stories").await.assert_status_ok();
}

#[tokio::test]
async fn test_paging_and_search_over_cached_collection() {
    let upstream = MockServer::start().await;
    mount_ids(&upstream, json!([1, 2]), 1).await;
    mount_item(
        &upstream,
        1,
        json!({"id": 1, "title": "First Story", "type": "story", "url": "https://one.example"}),
    )
    .await;
    mount_item(
        &upstream,
        2,
        json!({"id": 2, "title": "Second Story", "type": "story", "url": "https://two.example"}),
    )
    .await;

    let server = server_for(&settings_for(&upstream));

    let first_page = server
        .get("/api/stories")
        .add_query_param("page", 1)
        .add_query_param("pageSize", 1)
        .await;
    first_page.assert_status_ok();
    let body: Value = first_page.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["totalCount"], 2);

    let filtered = server
        .get("/api/stories")
        .add_query_param("pageSize", 10)
        .add_query_param("query", "Second")
        .await;
    filtered.assert_status_ok();
    let body: Value = filtered.json();
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["items"][0]["title"], "Second Story");

    let search = server
        .get("/api/stories/search")
        .add_query_param("query", "story")
        .await;
    search.assert_status_ok();
    let body: Value = search.json();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_paging_is_bad_request() {
    let upstream = MockServer::start().await;
    mount_ids(&upstream, json!([]), 0).await;

    let server = server_for(&settings_for(&upstream));

    server
        .get("/api/stories")
        .add_query_param("pageSize", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_identifier_list_failure_is_internal_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/newstories.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&upstream)
        .await;

    let server = server_for(&settings_for(&upstream));

    let response = server.get("/api/stories").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "An error occurred while processing your request."
    );

    // Nothing was cached, so the next request goes upstream again.
    server
        .get("/api/stories")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_url_policy_disabled_keeps_text_posts() {
    let upstream = MockServer::start().await;
    mount_ids(&upstream, json!([7]), 1).await;
    mount_item(
        &upstream,
        7,
        json!({"id": 7, "title": "Ask HN: anything", "type": "story"}),
    )
    .await;

    let settings = Settings {
        require_url: false,
        ..settings_for(&upstream)
    };
    let server = server_for(&settings);

    let response = server.get("/api/stories").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["totalCount"], 1);
    assert!(body["items"][0]["url"].is_null());
}

#[tokio::test]
async fn test_empty_upstream_is_not_found() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/newstories.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&upstream)
        .await;

    let server = server_for(&settings_for(&upstream));

    server
        .get("/api/stories")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
