//! Short URL creation, resolution and lifecycle service.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::domain::entities::{AccessScope, NewUrlRecord, UrlPatch, UrlRecord};
use crate::domain::repositories::{UrlFilter, UrlRepository, UrlTotals};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_long_url;

/// Service for creating, resolving and managing shortened URLs.
///
/// Owns the code generator; all storage goes through the injected
/// [`UrlRepository`].
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    generator: CodeGenerator,
}

impl UrlService {
    /// Creates a new URL service.
    pub fn new(repository: Arc<dyn UrlRepository>, generator: CodeGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Shortens `long_url` under a freshly generated six-character code.
    ///
    /// # Code Allocation
    ///
    /// The code is not checked for existence before insert. The insert itself
    /// is the uniqueness check: when the store reports a conflict on the
    /// short URL, a new code is drawn and the insert repeated. There is no
    /// retry cap; with 62^6 codes a collision streak only becomes likely
    /// near exhaustion of the code space.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is malformed or longer
    /// than 2048 characters. Storage errors other than a short URL conflict
    /// are propagated.
    #[instrument(skip(self, long_url))]
    pub async fn create(&self, long_url: String) -> Result<UrlRecord, AppError> {
        validate_long_url(&long_url)?;

        let mut new_url = NewUrlRecord::new(long_url, self.generator.generate())?;
        let mut attempts: u32 = 1;

        loop {
            match self.repository.create(new_url.clone()).await {
                Ok(record) => {
                    counter!("urls_created_total").increment(1);
                    info!(short_url = %record.short_url, attempts, "Short URL created");
                    return Ok(record);
                }
                Err(AppError::Conflict { .. }) => {
                    counter!("short_code_collisions_total").increment(1);
                    warn!(
                        short_url = new_url.short_url(),
                        attempts, "Short code collision, regenerating"
                    );
                    new_url = new_url.with_short_url(self.generator.generate())?;
                    attempts += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolves a code for redirection, recording the access.
    ///
    /// Only active records resolve.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or inactive.
    #[instrument(skip(self))]
    pub async fn resolve_for_redirect(&self, short_url: &str) -> Result<UrlRecord, AppError> {
        let record = self
            .repository
            .record_access(short_url, AccessScope::ActiveOnly)
            .await?
            .ok_or_else(|| {
                debug!("Redirect target missing or inactive");
                AppError::not_found(
                    "Short URL not found or inactive",
                    json!({ "short_url": short_url }),
                )
            })?;

        counter!("url_redirects_total").increment(1);
        Ok(record)
    }

    /// Retrieves a record by code, recording the access.
    ///
    /// Inactive records are still returned here; only redirects filter on
    /// `is_active`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, short_url: &str) -> Result<UrlRecord, AppError> {
        let record = self
            .repository
            .record_access(short_url, AccessScope::Any)
            .await?
            .ok_or_else(|| not_found(short_url))?;

        counter!("url_retrievals_total").increment(1);
        Ok(record)
    }

    /// Looks up a record without recording an access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    pub async fn get(&self, short_url: &str) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_short_url(short_url)
            .await?
            .ok_or_else(|| not_found(short_url))
    }

    /// Marks a record inactive. Deactivating an inactive record succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, short_url: &str) -> Result<UrlRecord, AppError> {
        let record = self
            .repository
            .deactivate(short_url)
            .await?
            .ok_or_else(|| not_found(short_url))?;

        info!("Short URL deactivated");
        Ok(record)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a new long URL is invalid.
    /// Returns [`AppError::NotFound`] if the code is unknown.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, short_url: &str, patch: UrlPatch) -> Result<UrlRecord, AppError> {
        if let Some(long_url) = &patch.long_url {
            validate_long_url(long_url)?;
        }

        self.repository
            .update(short_url, patch)
            .await?
            .ok_or_else(|| not_found(short_url))
    }

    /// Lists records newest first together with the total matching count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list(&self, filter: UrlFilter) -> Result<(Vec<UrlRecord>, i64), AppError> {
        tokio::try_join!(self.repository.list(&filter), self.repository.count(&filter))
    }

    /// Table-wide totals.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn totals(&self) -> Result<UrlTotals, AppError> {
        self.repository.totals().await
    }

    /// Checks storage connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn not_found(short_url: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "short_url": short_url }))
}
