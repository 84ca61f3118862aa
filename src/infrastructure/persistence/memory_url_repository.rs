//! In-process implementation of the URL repository.
//!
//! Intended for local development and tests. All state lives behind a single
//! mutex, which makes every operation (including the uniqueness check on
//! insert) atomic with respect to other callers. Data is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{AccessScope, NewUrlRecord, UrlPatch, UrlRecord};
use crate::domain::repositories::{UrlFilter, UrlRepository, UrlTotals};
use crate::error::AppError;

#[derive(Default)]
struct Store {
    next_id: i64,
    records: HashMap<String, UrlRecord>,
}

/// Mutex-guarded map from short URL to record.
#[derive(Default)]
pub struct MemoryUrlRepository {
    store: Mutex<Store>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sorted_matches(store: &Store, filter: &UrlFilter) -> Vec<UrlRecord> {
        let mut matches: Vec<UrlRecord> = store
            .records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matches
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let mut store = self.lock();

        if store.records.contains_key(new_url.short_url()) {
            return Err(AppError::conflict(
                "Short URL already exists",
                json!({ "short_url": new_url.short_url() }),
            ));
        }

        store.next_id += 1;
        let now = Utc::now();
        let record = UrlRecord::new(
            store.next_id,
            new_url.long_url().to_string(),
            new_url.short_url().to_string(),
            now,
            now,
            0,
            true,
        );
        store
            .records
            .insert(record.short_url.clone(), record.clone());

        Ok(record)
    }

    async fn find_by_short_url(&self, short_url: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.lock().records.get(short_url).cloned())
    }

    async fn record_access(
        &self,
        short_url: &str,
        scope: AccessScope,
    ) -> Result<Option<UrlRecord>, AppError> {
        let mut store = self.lock();

        Ok(store
            .records
            .get_mut(short_url)
            .filter(|r| scope.admits(r))
            .map(|r| {
                r.access_count += 1;
                r.last_accessed = Utc::now();
                r.clone()
            }))
    }

    async fn deactivate(&self, short_url: &str) -> Result<Option<UrlRecord>, AppError> {
        let mut store = self.lock();

        Ok(store.records.get_mut(short_url).map(|r| {
            r.is_active = false;
            r.clone()
        }))
    }

    async fn update(
        &self,
        short_url: &str,
        patch: UrlPatch,
    ) -> Result<Option<UrlRecord>, AppError> {
        let mut store = self.lock();

        Ok(store.records.get_mut(short_url).map(|r| {
            if let Some(long_url) = patch.long_url {
                r.long_url = long_url;
            }
            if let Some(is_active) = patch.is_active {
                r.is_active = is_active;
            }
            r.clone()
        }))
    }

    async fn list(&self, filter: &UrlFilter) -> Result<Vec<UrlRecord>, AppError> {
        let store = self.lock();
        let offset = usize::try_from(filter.offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit.max(0)).unwrap_or(usize::MAX);

        Ok(Self::sorted_matches(&store, filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count(&self, filter: &UrlFilter) -> Result<i64, AppError> {
        let store = self.lock();
        let count = store.records.values().filter(|r| filter.matches(r)).count();
        Ok(count as i64)
    }

    async fn totals(&self) -> Result<UrlTotals, AppError> {
        let store = self.lock();

        Ok(store
            .records
            .values()
            .fold(UrlTotals::default(), |mut totals, r| {
                totals.total += 1;
                if r.is_active {
                    totals.active += 1;
                }
                totals.accesses += r.access_count;
                totals
            }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
