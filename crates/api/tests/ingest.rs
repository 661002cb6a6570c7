//! Integration tests for the catalog load pipeline.
//!
//! The catalog is served by a mockito server; rows land in a real database.

mod common;

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::PgPool;
use superheroes_api::ingest::{load_catalog, IngestError, LoadSummary};
use superheroes_db::DbError;
use superheroes_source::{HeroSelector, HeroSourceClient, SourceError};

async fn catalog_server(path: &str, body: serde_json::Value) -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;
    server
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_all_writes_every_table(pool: PgPool) {
    let server = catalog_server("/all.json", common::raw_heroes_json()).await;
    let client = HeroSourceClient::new(server.url());

    let summary = load_catalog(&pool, &client, HeroSelector::All).await.unwrap();

    // Hulk's repeated Avengers entry is skipped.
    assert_eq!(
        summary,
        LoadSummary {
            heroes: 3,
            stats: 3,
            affiliations: 6,
        }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_single_hero_by_id(pool: PgPool) {
    let hero = json!({
        "id": 70,
        "name": "Batman",
        "biography": { "fullName": "Bruce Wayne", "publisher": "DC Comics" },
        "connections": { "groupAffiliation": "" },
        "powerstats": { "intelligence": 100 }
    });
    let server = catalog_server("/id/70.json", hero).await;
    let client = HeroSourceClient::new(server.url());

    let summary = load_catalog(&pool, &client, HeroSelector::ById(70)).await.unwrap();

    // An empty affiliation string still produces one row.
    assert_eq!(summary.affiliations, 1);

    let (affiliation,): (String,) =
        sqlx::query_as("SELECT affiliation FROM hero_affiliation WHERE id = 70")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(affiliation, "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_load_conflicts_on_hero_key(pool: PgPool) {
    let server = catalog_server("/all.json", common::raw_heroes_json()).await;
    let client = HeroSourceClient::new(server.url());

    load_catalog(&pool, &client, HeroSelector::All).await.unwrap();
    let result = load_catalog(&pool, &client, HeroSelector::All).await;

    assert_matches!(
        result,
        Err(IngestError::Db(DbError::Sqlx(sqlx::Error::Database(db_err))))
            if db_err.code().as_deref() == Some("23505")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upstream_failure_writes_nothing(pool: PgPool) {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/all.json")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let client = HeroSourceClient::new(server.url());

    let result = load_catalog(&pool, &client, HeroSelector::All).await;
    assert_matches!(result, Err(IngestError::Source(SourceError::Api { status: 500, .. })));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hero")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
