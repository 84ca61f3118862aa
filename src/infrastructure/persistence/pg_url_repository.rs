//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{AccessScope, NewUrlRecord, UrlPatch, UrlRecord};
use crate::domain::repositories::{UrlFilter, UrlRepository, UrlTotals};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_short_url;

const COLUMNS: &str = "id, long_url, short_url, created_at, last_accessed, access_count, is_active";

#[derive(FromRow)]
struct UrlRow {
    id: i64,
    long_url: String,
    short_url: String,
    created_at: DateTime<Utc>,
    last_accessed: DateTime<Utc>,
    access_count: i64,
    is_active: bool,
}

impl From<UrlRow> for UrlRecord {
    fn from(r: UrlRow) -> Self {
        UrlRecord::new(
            r.id,
            r.long_url,
            r.short_url,
            r.created_at,
            r.last_accessed,
            r.access_count,
            r.is_active,
        )
    }
}

#[derive(FromRow)]
struct TotalsRow {
    total: i64,
    active: i64,
    accesses: i64,
}

/// PostgreSQL repository for URL records.
///
/// Uniqueness of `short_url` is enforced by the `urls_short_url_key`
/// constraint; access increments are single `UPDATE ... RETURNING`
/// statements, so concurrent hits never lose a count.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Builds an `ILIKE` pattern matching `term` anywhere, escaping wildcards.
fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "INSERT INTO urls (long_url, short_url) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(new_url.long_url())
        .bind(new_url.short_url())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_short_url(&e) {
                AppError::conflict(
                    "Short URL already exists",
                    json!({ "short_url": new_url.short_url() }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {COLUMNS} FROM urls WHERE short_url = $1"
        ))
        .bind(short_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn record_access(
        &self,
        short_url: &str,
        scope: AccessScope,
    ) -> Result<Option<UrlRecord>, AppError> {
        let include_inactive = scope == AccessScope::Any;

        let row = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            UPDATE urls
            SET access_count = access_count + 1, last_accessed = NOW()
            WHERE short_url = $1 AND ($2 OR is_active)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(short_url)
        .bind(include_inactive)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn deactivate(&self, short_url: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "UPDATE urls SET is_active = FALSE WHERE short_url = $1 RETURNING {COLUMNS}"
        ))
        .bind(short_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn update(
        &self,
        short_url: &str,
        patch: UrlPatch,
    ) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            UPDATE urls
            SET long_url = COALESCE($2, long_url),
                is_active = COALESCE($3, is_active)
            WHERE short_url = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(short_url)
        .bind(patch.long_url)
        .bind(patch.is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn list(&self, filter: &UrlFilter) -> Result<Vec<UrlRecord>, AppError> {
        let rows = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM urls
            WHERE ($1::boolean IS NULL OR is_active = $1)
              AND ($2::text IS NULL OR short_url ILIKE $2 OR long_url ILIKE $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.is_active)
        .bind(filter.search.as_deref().map(contains_pattern))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UrlRecord::from).collect())
    }

    async fn count(&self, filter: &UrlFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM urls
            WHERE ($1::boolean IS NULL OR is_active = $1)
              AND ($2::text IS NULL OR short_url ILIKE $2 OR long_url ILIKE $2)
            "#,
        )
        .bind(filter.is_active)
        .bind(filter.search.as_deref().map(contains_pattern))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn totals(&self) -> Result<UrlTotals, AppError> {
        let row = sqlx::query_as::<_, TotalsRow>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_active) AS active,
                COALESCE(SUM(access_count), 0)::BIGINT AS accesses
            FROM urls
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(UrlTotals {
            total: row.total,
            active: row.active,
            accesses: row.accesses,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
