#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use superheroes_api::config::ServerConfig;
use superheroes_api::ingest::{self, LoadSummary};
use superheroes_api::router::build_app_router;
use superheroes_api::state::AppState;
use superheroes_core::hero::RawHero;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: String::new(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Three heroes: Spidey (strength 55), Hulk (strength 99) and Robin
/// (strength 10). Hulk lists Avengers twice.
pub fn raw_heroes() -> Vec<RawHero> {
    serde_json::from_value(raw_heroes_json()).expect("valid raw heroes")
}

pub fn raw_heroes_json() -> Value {
    json!([
        {
            "id": 1,
            "name": "Spidey",
            "biography": { "fullName": "Peter Parker" },
            "connections": { "groupAffiliation": "Avengers, Defenders" },
            "powerstats": { "strength": 55 }
        },
        {
            "id": 2,
            "name": "Hulk",
            "biography": {
                "fullName": "Bruce Banner",
                "firstAppearance": "Incredible Hulk #1",
                "publisher": "Marvel Comics"
            },
            "appearance": { "race": "Human / Radiation" },
            "connections": { "groupAffiliation": "Avengers; Defenders; Avengers" },
            "powerstats": { "strength": 99, "durability": 100 }
        },
        {
            "id": 3,
            "name": "Robin",
            "connections": { "groupAffiliation": "Teen Titans, Young Avengers" },
            "powerstats": { "strength": "10", "speed": "null" }
        }
    ])
}

/// Store the fixture heroes through the ingestion pipeline.
pub async fn seed(pool: &PgPool) -> LoadSummary {
    ingest::store_heroes(pool, &raw_heroes())
        .await
        .expect("fixture heroes load")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty()).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body, with an optional content type, bypassing JSON encoding.
pub async fn post_raw(
    app: Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
