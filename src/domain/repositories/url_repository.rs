//! Repository trait for URL record data access.

use crate::domain::entities::{AccessScope, NewUrlRecord, UrlPatch, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Filter criteria for listing records.
///
/// Supports activity filtering, case-insensitive search over both URL
/// columns, and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFilter {
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

impl UrlFilter {
    /// Creates a new filter with pagination parameters.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            is_active: None,
            search: None,
            offset,
            limit,
        }
    }

    /// Restricts results to active or inactive records.
    pub fn with_active(mut self, is_active: Option<bool>) -> Self {
        self.is_active = is_active;
        self
    }

    /// Adds a substring search over `short_url` and `long_url`.
    ///
    /// Blank search terms are ignored.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    /// Returns true if `record` passes the activity and search criteria.
    ///
    /// Pagination is not considered.
    pub fn matches(&self, record: &UrlRecord) -> bool {
        if let Some(is_active) = self.is_active
            && record.is_active != is_active
        {
            return false;
        }

        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                record.short_url.to_lowercase().contains(&term)
                    || record.long_url.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Table-wide totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlTotals {
    pub total: i64,
    pub active: i64,
    pub accesses: i64,
}

/// Repository interface for URL records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process store
/// - Test mocks available with `cfg(test)`
///
/// # Concurrency
///
/// Implementations must enforce `short_url` uniqueness atomically on
/// [`UrlRepository::create`] and apply each access increment as a single
/// atomic step; callers never lock around these calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record with `access_count = 0` and `is_active = true`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short URL is already taken.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Finds a record by short URL without touching its statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Increments `access_count` by one and sets `last_accessed` to now.
    ///
    /// Only records admitted by `scope` are touched.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlRecord))` with the updated statistics
    /// - `Ok(None)` if no admitted record matches
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record_access(
        &self,
        short_url: &str,
        scope: AccessScope,
    ) -> Result<Option<UrlRecord>, AppError>;

    /// Sets `is_active = false`. Idempotent.
    ///
    /// Returns `Ok(None)` if no record matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn deactivate(&self, short_url: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Partially updates a record. The patch must already be validated.
    ///
    /// Returns `Ok(None)` if no record matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update(&self, short_url: &str, patch: UrlPatch)
    -> Result<Option<UrlRecord>, AppError>;

    /// Lists records newest first, applying `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self, filter: &UrlFilter) -> Result<Vec<UrlRecord>, AppError>;

    /// Counts records matching `filter`, ignoring its pagination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self, filter: &UrlFilter) -> Result<i64, AppError>;

    /// Returns table-wide totals.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn totals(&self) -> Result<UrlTotals, AppError>;

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
