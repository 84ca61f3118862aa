#![allow(dead_code)]

use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;
use urlshort::application::services::UrlService;
use urlshort::domain::repositories::UrlRepository;
use urlshort::infrastructure::persistence::{MemoryUrlRepository, PgUrlRepository};
use urlshort::routes::build_router;
use urlshort::state::AppState;
use urlshort::utils::code_generator::CodeGenerator;

pub const TEST_SEED: u64 = 42;

pub fn create_state(repository: Arc<dyn UrlRepository>) -> AppState {
    let service = UrlService::new(repository, CodeGenerator::seeded(TEST_SEED));
    AppState::new(Arc::new(service))
}

pub fn create_memory_state() -> AppState {
    create_state(Arc::new(MemoryUrlRepository::new()))
}

pub fn create_pg_state(pool: PgPool) -> AppState {
    create_state(Arc::new(PgUrlRepository::new(Arc::new(pool))))
}

/// Test server over the in-memory store, without rate limiting.
pub fn memory_server() -> TestServer {
    TestServer::new(build_router(create_memory_state())).unwrap()
}

pub async fn insert_url(pool: &PgPool, short_url: &str, long_url: &str, is_active: bool) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO urls (short_url, long_url, is_active) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(short_url)
    .bind(long_url)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn access_count(pool: &PgPool, short_url: &str) -> i64 {
    sqlx::query_scalar("SELECT access_count FROM urls WHERE short_url = $1")
        .bind(short_url)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Inserts an active record whose timestamps lie one day in the past.
pub async fn insert_stale_url(pool: &PgPool, short_url: &str, long_url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO urls (short_url, long_url, created_at, last_accessed)
         VALUES ($1, $2, NOW() - INTERVAL '1 day', NOW() - INTERVAL '1 day')
         RETURNING id",
    )
    .bind(short_url)
    .bind(long_url)
    .fetch_one(pool)
    .await
    .unwrap()
}
