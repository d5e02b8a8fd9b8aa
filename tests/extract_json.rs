mod common;

use axum::http::StatusCode;
use import_records::prelude::*;
use serde_json::json;

#[tokio::test]
async fn test_article_accepted_and_echoed() {
    let server = common::create_test_server();

    let response = server
        .post("/article")
        .json(&json!({
            "size": 42,
            "text": "hello",
            "category": "news",
            "tag": "x"
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["size"], 42);
    assert_eq!(json["text"], "hello");
    assert_eq!(json["category"], "news");
    assert_eq!(json["tag"], "x");
}

#[tokio::test]
async fn test_article_without_optionals() {
    let server = common::create_test_server();

    let response = server.post("/article").json(&json!({ "size": 42 })).await;

    response.assert_status_ok();
    let article = response.json::<ArticleData>();
    assert_eq!(article, ArticleData::new(42));
}

#[tokio::test]
async fn test_missing_size_is_unprocessable() {
    let server = common::create_test_server();

    let response = server.post("/entity").json(&json!({})).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["details"]["record"], "EntityData");
    assert_eq!(
        json["error"]["details"]["issues"],
        json!([{ "field": "size", "code": "missing", "expected": "integer" }])
    );
}

#[tokio::test]
async fn test_non_numeric_size_reports_types() {
    let server = common::create_test_server();

    let response = server
        .post("/entity")
        .json(&json!({ "size": "not-a-number" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let json = response.json::<serde_json::Value>();
    let issue = &json["error"]["details"]["issues"][0];
    assert_eq!(issue["field"], "size");
    assert_eq!(issue["code"], "invalid_type");
    assert_eq!(issue["expected"], "integer");
    assert_eq!(issue["found"], "string");
}

#[tokio::test]
async fn test_count_type_field() {
    let server = common::create_test_server();

    let response = server.post("/count").json(&json!({ "type": "click" })).await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>(), json!({ "type": "click" }));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = common::create_test_server();

    let response = server.post("/count").text("type=click").await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let json = response.json::<serde_json::Value>();
    let issue = &json["error"]["details"]["issues"][0];
    assert_eq!(issue["field"], "__root__");
    assert_eq!(issue["code"], "malformed");
}

#[tokio::test]
async fn test_array_body_is_not_an_object() {
    let server = common::create_test_server();

    let response = server.post("/entity").json(&json!([{ "size": 1 }])).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let json = response.json::<serde_json::Value>();
    let issue = &json["error"]["details"]["issues"][0];
    assert_eq!(issue["code"], "not_an_object");
    assert_eq!(issue["found"], "array");
}

#[tokio::test]
async fn test_default_options_are_lax() {
    let server = common::create_test_server();

    let response = server
        .post("/article")
        .json(&json!({ "size": "7", "extra": true }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<ArticleData>().size, 7);
}

#[tokio::test]
async fn test_options_from_extension() {
    let server = common::create_test_server_with(ParseOptions::strict());

    let response = server
        .post("/article")
        .json(&json!({ "size": "7", "extra": true }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let json = response.json::<serde_json::Value>();
    let fields: Vec<_> = json["error"]["details"]["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["size", "extra"]);
}
