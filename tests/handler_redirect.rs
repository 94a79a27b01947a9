mod common;

use axum::http::StatusCode;
use common::{create_link, create_parameterized_link, drain_views, spawn_app};
use golinks::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_redirect_exact_keyword() {
    let mut app = spawn_app();
    let link = create_link(&app.store, "wiki", "https://wiki.example.com").await;

    let response = app.server.get("/wiki").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://wiki.example.com");

    let events = drain_views(&mut app.views);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].link_id, link.id);
    assert_eq!(events[0].keyword, "wiki");
}

#[tokio::test]
async fn test_redirect_slash_keyword_ignores_trailing_segments() {
    let app = spawn_app();
    create_link(&app.store, "kibana/prod", "https://kibana.example.com/prod").await;

    let response = app.server.get("/kibana/prod/extra/stuff").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://kibana.example.com/prod");
}

#[tokio::test]
async fn test_redirect_slash_keyword_takes_wildcard_arguments() {
    let app = spawn_app();
    create_link(&app.store, "kibana/logs", "https://kibana.example.com/{*}/{*}").await;

    let response = app.server.get("/kibana/logs/prod/errors").await;

    assert_eq!(response.header("location"), "https://kibana.example.com/prod/errors");
}

#[tokio::test]
async fn test_redirect_base_keyword_scenario() {
    let app = spawn_app();
    create_link(
        &app.store,
        "gh",
        "https://github.com/org/{*}/issues/{*}",
    )
    .await;

    let response = app.server.get("/gh/repo-a/42").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://github.com/org/repo-a/issues/42"
    );
}

#[tokio::test]
async fn test_redirect_fewer_arguments_than_placeholders() {
    let app = spawn_app();
    create_link(&app.store, "gh", "https://github.com/org/{*}/issues/{*}").await;

    let response = app.server.get("/gh/repo-a").await;

    assert_eq!(
        response.header("location"),
        "https://github.com/org/repo-a/issues/{*}"
    );
}

#[tokio::test]
async fn test_redirect_extra_arguments_are_dropped() {
    let app = spawn_app();
    create_link(&app.store, "jira", "https://jira.example.com/browse/{*}").await;

    let response = app.server.get("/jira/PROJ-1/ignored/too").await;

    assert_eq!(
        response.header("location"),
        "https://jira.example.com/browse/PROJ-1"
    );
}

#[tokio::test]
async fn test_redirect_parameterized_without_placeholder_is_unchanged() {
    let app = spawn_app();
    create_parameterized_link(&app.store, "status", "https://status.example.com").await;

    let response = app.server.get("/status/anything").await;

    assert_eq!(response.header("location"), "https://status.example.com");
}

#[tokio::test]
async fn test_redirect_exact_match_takes_precedence_over_base_keyword() {
    let app = spawn_app();
    create_link(&app.store, "a/b", "https://exact.example.com").await;
    create_link(&app.store, "a", "https://base.example.com/{*}").await;

    let response = app.server.get("/a/b").await;

    assert_eq!(response.header("location"), "https://exact.example.com");
}

/// A plain single-segment link never absorbs extra segments. Only legacy
/// `keyword/{*}` links append the rest of the path.
#[tokio::test]
async fn test_redirect_plain_keyword_with_extra_segments_misses() {
    let mut app = spawn_app();
    create_link(&app.store, "wiki", "https://wiki.example.com").await;

    let response = app.server.get("/wiki/some/page").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "/?q=wiki");
    assert!(drain_views(&mut app.views).is_empty());
}

#[tokio::test]
async fn test_redirect_legacy_wildcard_joins_remaining_segments() {
    let app = spawn_app();
    create_link(&app.store, "docs/{*}", "https://wiki.example/{*}").await;

    let response = app.server.get("/docs/team/page").await;

    assert_eq!(response.header("location"), "https://wiki.example/team/page");
}

#[tokio::test]
async fn test_redirect_legacy_wildcard_fills_first_placeholder_only() {
    let app = spawn_app();
    create_link(&app.store, "docs/{*}", "https://wiki.example/{*}?from={*}").await;

    let response = app.server.get("/docs/team/page").await;

    assert_eq!(
        response.header("location"),
        "https://wiki.example/team/page?from={*}"
    );
}

#[tokio::test]
async fn test_redirect_legacy_wildcard_needs_a_remaining_segment() {
    let app = spawn_app();
    create_link(&app.store, "docs/{*}", "https://wiki.example/{*}").await;

    let response = app.server.get("/docs").await;

    assert_eq!(response.header("location"), "/?q=docs");
}

#[tokio::test]
async fn test_redirect_miss_goes_to_search() {
    let mut app = spawn_app();

    let response = app.server.get("/foo/bar").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "/?q=foo");
    assert!(drain_views(&mut app.views).is_empty());
}

#[tokio::test]
async fn test_redirect_is_idempotent() {
    let mut app = spawn_app();
    create_link(&app.store, "gh", "https://github.com/{*}").await;

    let first = app.server.get("/gh/rust-lang").await;
    let second = app.server.get("/gh/rust-lang").await;

    assert_eq!(first.header("location"), second.header("location"));
    assert_eq!(drain_views(&mut app.views).len(), 2);
}

#[tokio::test]
async fn test_view_worker_applies_scheduled_events() {
    let app = spawn_app();
    let link = create_link(&app.store, "gh", "https://github.com/{*}").await;

    app.server.get("/gh/a").await;
    app.server.get("/gh/b").await;

    let common::TestApp { store, views, .. } = app;
    let handle = tokio::spawn(golinks::domain::view_worker::run_view_worker(
        views,
        store.clone(),
        2,
    ));

    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        loop {
            let current = store.find_by_id(link.id).await.unwrap().unwrap();
            if current.views == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("views were not recorded");

    handle.abort();
}

#[tokio::test]
async fn test_redirect_keeps_encoded_slash_inside_one_argument() {
    let app = spawn_app();
    create_link(&app.store, "s", "https://search.example/?q={*}&page={*}").await;

    let response = app.server.get("/s/hello%20world/a%2Fb").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://search.example/?q=hello%20world&page=a%2Fb"
    );
}

#[tokio::test]
async fn test_redirect_legacy_wildcard_keeps_segment_encoding() {
    let app = spawn_app();
    create_link(&app.store, "docs/{*}", "https://wiki.example/{*}").await;

    let response = app.server.get("/docs/my%20team/a%2Fb").await;

    assert_eq!(
        response.header("location"),
        "https://wiki.example/my%20team/a%2Fb"
    );
}

#[tokio::test]
async fn test_redirect_encoded_control_character_is_not_an_error() {
    let app = spawn_app();
    create_link(&app.store, "gh", "https://github.com/{*}").await;

    let response = app.server.get("/gh/a%0Ab").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://github.com/a%0Ab");
}

#[tokio::test]
async fn test_redirect_miss_encodes_search_term() {
    let app = spawn_app();

    let response = app.server.get("/a%26b").await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "/?q=a%26b");
}
