//! Integration tests for hero lookups, ranking, updates and deletes.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, post_raw, seed};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// GET /hero/{name}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_hero_returns_info_stats_and_affiliations(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/hero/HULK").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "heroes": [{
                "info": {
                    "id": 2,
                    "name": "Bruce Banner",
                    "alias": "Hulk",
                    "species": "Human / Radiation",
                    "first_appearance": "Incredible Hulk #1",
                    "publisher": "Marvel Comics"
                },
                "stats": {
                    "id": 2,
                    "intelligence": 0,
                    "strength": 99,
                    "speed": 0,
                    "durability": 100,
                    "power": 0,
                    "combat": 0
                },
                "affiliations": ["Avengers", "Defenders"]
            }]
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_hero_defaults_missing_sub_mappings(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/hero/robin").await).await;
    let robin = &json["heroes"][0];

    // No biography or appearance in the catalog record.
    assert_eq!(robin["info"]["name"], "");
    assert_eq!(robin["info"]["species"], "");
    assert_eq!(robin["stats"]["strength"], 10);
    assert_eq!(robin["stats"]["speed"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_hero_with_wildcard_returns_every_match(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/hero/%25i%25").await).await;
    let aliases: Vec<_> = json["heroes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|hero| hero["info"]["alias"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(aliases, vec!["Spidey", "Robin"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_hero_returns_empty_list(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/hero/Superman").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "heroes": [] }));
}

// ---------------------------------------------------------------------------
// GET /hero/strongest/{stat}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn strongest_returns_top_n_descending(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/hero/strongest/strength?limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        body_json(response).await,
        json!({
            "status": "SUCCESS",
            "heroes": [
                { "alias": "Hulk", "strength": 99 },
                { "alias": "Spidey", "strength": 55 }
            ]
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strongest_defaults_limit_and_ignores_stat_case(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/hero/strongest/Durability").await).await;
    let heroes = json["heroes"].as_array().unwrap();

    // Only three heroes exist, fewer than the default limit of 5.
    assert_eq!(heroes.len(), 3);
    assert_eq!(heroes[0], json!({ "alias": "Hulk", "durability": 100 }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strongest_rejects_unknown_stat(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/hero/strongest/charisma").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().unwrap().contains("charisma"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strongest_rejects_injection_through_stat(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = get(app, "/hero/strongest/strength;%20DROP%20TABLE%20hero").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hero")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strongest_rejects_non_numeric_limit_as_json(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/hero/strongest/strength?limit=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["message"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn strongest_rejects_negative_limit(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/hero/strongest/speed?limit=-1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// POST /fix
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_updates_stats_and_returns_row(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let body = json!({ "table": "hero_stats", "name": "spidey", "combat": 85 });
    let response = post_json(app, "/fix", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        body_json(response).await,
        json!({
            "status": "SUCCESS",
            "response": {
                "alias": "Spidey",
                "hero_stats": {
                    "id": 1,
                    "intelligence": 0,
                    "strength": 55,
                    "speed": 0,
                    "durability": 0,
                    "power": 0,
                    "combat": 85
                }
            }
        })
    );

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/hero/Spidey").await).await;
    assert_eq!(json["heroes"][0]["stats"]["combat"], 85);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_updates_hero_columns(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "table": "hero",
        "name": "Robin",
        "publisher": "DC Comics",
        "species": null
    });
    let response = post_json(app, "/fix", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["response"]["alias"], "Robin");
    assert_eq!(json["response"]["publisher"], "DC Comics");
    assert_eq!(json["response"]["species"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_without_table_is_rejected_and_changes_nothing(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json(app, "/fix", json!({ "name": "Hulk", "strength": 1 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "table is required");

    let strength: (i32,) = sqlx::query_as("SELECT strength FROM hero_stats WHERE id = 2")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(strength.0, 99);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_rejects_columns_outside_allow_list(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({ "table": "hero", "name": "Hulk", "id": 7 });
    let response = post_json(app, "/fix", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_with_malformed_json_returns_json_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_raw(app, "/fix", Some("application/json"), "{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_without_content_type_returns_json_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = r#"{"table":"hero","name":"Hulk","publisher":"Marvel"}"#;
    let response = post_raw(app, "/fix", None, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["message"].as_str().unwrap().contains("Content-Type"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_affiliation_of_multi_group_hero_returns_409(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let body = json!({
        "table": "hero_affiliation",
        "name": "Spidey",
        "affiliation": "New Avengers"
    });
    let response = post_json(app, "/fix", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert!(json["message"].as_str().unwrap().contains("affiliations"));

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/hero/Spidey").await).await;
    assert_eq!(json["heroes"][0]["affiliations"], json!(["Avengers", "Defenders"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_unknown_alias_returns_404(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({ "table": "hero_stats", "name": "Superman", "power": 100 });
    let response = post_json(app, "/fix", body).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fix_ambiguous_alias_returns_409(pool: PgPool) {
    seed(&pool).await;
    sqlx::query("INSERT INTO hero (id, alias) VALUES (4, 'robin')")
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let body = json!({ "table": "hero", "name": "Robin", "publisher": "DC Comics" });
    let response = post_json(app, "/fix", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// DELETE /delete/{name}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_hero_and_dependents(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = delete(app, "/delete/hulk").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "status": "SUCCESS", "deleted": 1 })
    );

    let app = common::build_test_app(pool.clone());
    assert_eq!(body_json(get(app, "/hero/Hulk").await).await, json!({ "heroes": [] }));

    let stats: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hero_stats WHERE id = 2")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stats.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_unknown_alias_succeeds_with_zero(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = delete(app, "/delete/Superman").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], 0);
}
