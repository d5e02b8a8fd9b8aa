#![allow(dead_code)]

use axum::{Extension, Json, Router, routing::post};
use axum_test::TestServer;
use import_records::prelude::*;

async fn echo_article(ValidatedJson(article): ValidatedJson<ArticleData>) -> Json<ArticleData> {
    Json(article)
}

async fn echo_entity(ValidatedJson(entity): ValidatedJson<EntityData>) -> Json<EntityData> {
    Json(entity)
}

async fn echo_count(ValidatedJson(count): ValidatedJson<CountData>) -> Json<CountData> {
    Json(count)
}

pub fn create_router() -> Router {
    Router::new()
        .route("/article", post(echo_article))
        .route("/entity", post(echo_entity))
        .route("/count", post(echo_count))
}

pub fn create_test_server() -> TestServer {
    TestServer::new(create_router()).unwrap()
}

pub fn create_test_server_with(options: ParseOptions) -> TestServer {
    TestServer::new(create_router().layer(Extension(options))).unwrap()
}
