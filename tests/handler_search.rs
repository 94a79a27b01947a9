mod common;

use common::{create_link, spawn_app};
use serde_json::Value;

#[tokio::test]
async fn test_search_matches_keyword_destination_and_description() {
    let app = spawn_app();
    create_link(&app.store, "wiki", "https://wiki.example.com").await;
    create_link(&app.store, "gh", "https://github.com").await;
    create_link(&app.store, "handbook", "https://docs.example.com/WIKI/handbook").await;

    let response = app.server.get("/").add_query_param("q", "Wiki").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["query"], "Wiki");

    let keywords: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["keyword"].as_str().unwrap())
        .collect();
    assert_eq!(keywords, vec!["handbook", "wiki"]);
}

#[tokio::test]
async fn test_search_without_term_lists_everything() {
    let app = spawn_app();
    create_link(&app.store, "wiki", "https://wiki.example.com").await;
    create_link(&app.store, "gh", "https://github.com").await;

    let response = app.server.get("/").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert!(body["query"].is_null());
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_miss_redirect_lands_on_search() {
    let app = spawn_app();
    create_link(&app.store, "foobar", "https://foobar.example.com").await;

    let miss = app.server.get("/foo").await;
    assert_eq!(miss.header("location"), "/?q=foo");

    let response = app.server.get("/").add_query_param("q", "foo").await;
    let body = response.json::<Value>();
    assert_eq!(body["results"][0]["keyword"], "foobar");
}
