mod common;

use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::PgPool;
use urlshort::routes::build_router;
use urlshort::utils::code_generator::is_valid_code;

async fn create(server: &TestServer, long_url: &str) -> Value {
    let response = server
        .post("/api/urls")
        .json(&json!({ "long_url": long_url }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_create_returns_record() {
    let server = common::memory_server();

    let body = create(&server, "https://www.example.com").await;

    let code = body["short_url"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(is_valid_code(code));
    assert_eq!(body["long_url"], "https://www.example.com");
    assert_eq!(body["access_count"], 0);
    assert_eq!(body["is_active"], true);
    assert!(body["id"].is_i64());
    assert!(body["created_at"].is_string());
    assert!(body["last_accessed"].is_string());
}

#[tokio::test]
async fn test_create_ignores_client_fields() {
    let server = common::memory_server();

    let response = server
        .post("/api/urls")
        .json(&json!({
            "long_url": "https://www.example.com",
            "short_url": "custom",
            "access_count": 99,
            "is_active": false
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_ne!(body["short_url"], "custom");
    assert_eq!(body["access_count"], 0);
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn test_create_same_url_twice_yields_distinct_codes() {
    let server = common::memory_server();

    let first = create(&server, "https://www.example.com").await;
    let second = create(&server, "https://www.example.com").await;

    assert_ne!(first["short_url"], second["short_url"]);
}

#[tokio::test]
async fn test_create_invalid_url() {
    let server = common::memory_server();

    let response = server
        .post("/api/urls")
        .json(&json!({ "long_url": "not-a-valid-url" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"]["long_url"].is_array());
}

#[tokio::test]
async fn test_create_rejects_whitespace_in_url() {
    let server = common::memory_server();

    for long_url in [
        "https://example.com/a\nb",
        "https://example.com/a\tb",
        "https://example.com/a b",
    ] {
        let response = server
            .post("/api/urls")
            .json(&json!({ "long_url": long_url }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["error"]["details"]["long_url"][0], "Enter a valid URL.");
    }

    let listed = server.get("/api/urls").await.json::<Value>();
    assert_eq!(listed["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_create_missing_long_url() {
    let server = common::memory_server();

    let response = server.post("/api/urls").json(&json!({})).await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert!(body["error"]["details"]["long_url"].is_array());
}

#[tokio::test]
async fn test_create_too_long_url() {
    let server = common::memory_server();
    let long_url = format!("https://www.example.com/{}", "a".repeat(2048));

    let response = server
        .post("/api/urls")
        .json(&json!({ "long_url": long_url }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_non_json_body() {
    let server = common::memory_server();

    let response = server.post("/api/urls").text("long_url=oops").await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_retrieve_increments_access_count() {
    let server = common::memory_server();
    let created = create(&server, "https://www.example.com").await;
    let code = created["short_url"].as_str().unwrap();

    let first = server.get(&format!("/api/urls/{code}")).await;
    first.assert_status_ok();
    assert_eq!(first.json::<Value>()["access_count"], 1);

    let second = server.get(&format!("/api/urls/{code}")).await;
    assert_eq!(second.json::<Value>()["access_count"], 2);
}

#[tokio::test]
async fn test_retrieve_not_found() {
    let server = common::memory_server();

    let response = server.get("/api/urls/nope00").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_deactivate_lifecycle() {
    let server = common::memory_server();
    let created = create(&server, "https://www.example.com").await;
    let code = created["short_url"].as_str().unwrap();

    let retrieved = server.get(&format!("/api/urls/{code}")).await;
    assert_eq!(retrieved.json::<Value>()["access_count"], 1);

    let deactivated = server
        .post(&format!("/api/urls/{code}/deactivate"))
        .await;
    deactivated.assert_status_ok();
    deactivated.assert_json(&json!({ "status": "URL deactivated" }));

    server.get(&format!("/{code}")).await.assert_status_not_found();

    // Inactive records remain visible through the API.
    let after = server.get(&format!("/api/urls/{code}")).await;
    after.assert_status_ok();
    let body = after.json::<Value>();
    assert_eq!(body["is_active"], false);
    assert_eq!(body["access_count"], 2);
}

#[tokio::test]
async fn test_deactivate_twice_succeeds() {
    let server = common::memory_server();
    let created = create(&server, "https://www.example.com").await;
    let code = created["short_url"].as_str().unwrap();

    for _ in 0..2 {
        server
            .post(&format!("/api/urls/{code}/deactivate"))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_deactivate_not_found() {
    let server = common::memory_server();

    server
        .post("/api/urls/nope00/deactivate")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_update_long_url_and_reactivate() {
    let server = common::memory_server();
    let created = create(&server, "https://www.example.com").await;
    let code = created["short_url"].as_str().unwrap();

    server
        .post(&format!("/api/urls/{code}/deactivate"))
        .await
        .assert_status_ok();

    let response = server
        .patch(&format!("/api/urls/{code}"))
        .json(&json!({ "long_url": "https://www.rust-lang.org", "is_active": true }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["long_url"], "https://www.rust-lang.org");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["short_url"], code);

    let redirect = server.get(&format!("/{code}")).await;
    assert_eq!(redirect.status_code(), 302);
    assert_eq!(redirect.header("location"), "https://www.rust-lang.org");
}

#[tokio::test]
async fn test_update_rejects_invalid_url() {
    let server = common::memory_server();
    let created = create(&server, "https://www.example.com").await;
    let code = created["short_url"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/urls/{code}"))
        .json(&json!({ "long_url": "not a url" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_replace_updates_long_url() {
    let server = common::memory_server();
    let created = create(&server, "https://www.example.com").await;
    let code = created["short_url"].as_str().unwrap();

    let response = server
        .put(&format!("/api/urls/{code}"))
        .json(&json!({ "long_url": "https://www.rust-lang.org" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["long_url"], "https://www.rust-lang.org");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["access_count"], 0);
}

#[tokio::test]
async fn test_replace_requires_long_url() {
    let server = common::memory_server();
    let created = create(&server, "https://www.example.com").await;
    let code = created["short_url"].as_str().unwrap();

    let response = server
        .put(&format!("/api/urls/{code}"))
        .json(&json!({ "is_active": false }))
        .await;

    response.assert_status_bad_request();
    assert!(response.json::<Value>()["error"]["details"]["long_url"].is_array());
}

#[tokio::test]
async fn test_replace_not_found() {
    let server = common::memory_server();

    server
        .put("/api/urls/nope00")
        .json(&json!({ "long_url": "https://www.example.com" }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_update_not_found() {
    let server = common::memory_server();

    server
        .patch("/api/urls/nope00")
        .json(&json!({ "is_active": false }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_list_newest_first_with_filters() {
    let server = common::memory_server();
    let first = create(&server, "https://www.example.com/one").await;
    let second = create(&server, "https://www.rust-lang.org/two").await;
    let third = create(&server, "https://www.example.com/three").await;

    server
        .post(&format!(
            "/api/urls/{}/deactivate",
            first["short_url"].as_str().unwrap()
        ))
        .await
        .assert_status_ok();

    let all = server.get("/api/urls").await;
    all.assert_status_ok();
    let body = all.json::<Value>();
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["page_size"], 25);
    let codes: Vec<&Value> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| &item["short_url"])
        .collect();
    assert_eq!(
        codes,
        vec![&third["short_url"], &second["short_url"], &first["short_url"]]
    );

    let active = server
        .get("/api/urls")
        .add_query_param("is_active", "true")
        .await
        .json::<Value>();
    assert_eq!(active["pagination"]["total"], 2);

    let searched = server
        .get("/api/urls")
        .add_query_param("search", "EXAMPLE")
        .add_query_param("is_active", "true")
        .await
        .json::<Value>();
    assert_eq!(searched["pagination"]["total"], 1);
    assert_eq!(searched["items"][0]["short_url"], third["short_url"]);
}

#[tokio::test]
async fn test_list_rejects_bad_page_size() {
    let server = common::memory_server();

    let response = server
        .get("/api/urls")
        .add_query_param("page_size", "5")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_list_rejects_non_numeric_page() {
    let server = common::memory_server();

    let response = server.get("/api/urls").add_query_param("page", "two").await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
}

#[sqlx::test]
async fn test_create_and_retrieve_postgres(pool: PgPool) {
    let server = TestServer::new(build_router(common::create_pg_state(pool.clone()))).unwrap();

    let created = create(&server, "https://www.example.com").await;
    let code = created["short_url"].as_str().unwrap();

    server
        .get(&format!("/api/urls/{code}"))
        .await
        .assert_status_ok();

    assert_eq!(common::access_count(&pool, code).await, 1);
}
