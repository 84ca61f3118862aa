//! URL record entity: the mapping from a short code to its long URL.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::AppError;
use crate::utils::url_validator::{validate_long_url, validate_short_url};

/// A shortened URL with its access statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub id: i64,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: i64,
    pub is_active: bool,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        long_url: String,
        short_url: String,
        created_at: DateTime<Utc>,
        last_accessed: DateTime<Utc>,
        access_count: i64,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            long_url,
            short_url,
            created_at,
            last_accessed,
            access_count,
            is_active,
        }
    }
}

impl fmt::Display for UrlRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.short_url, self.long_url)
    }
}

/// Validated input for inserting a record.
///
/// Both fields are checked on construction, so a value of this type always
/// satisfies the length and format rules of the `urls` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    long_url: String,
    short_url: String,
}

impl NewUrlRecord {
    /// Validates and builds an insert request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `long_url` is malformed or longer
    /// than 2048 characters, or `short_url` is empty or longer than 10.
    pub fn new(long_url: impl Into<String>, short_url: impl Into<String>) -> Result<Self, AppError> {
        let long_url = long_url.into();
        let short_url = short_url.into();

        validate_long_url(&long_url)?;
        validate_short_url(&short_url)?;

        Ok(Self {
            long_url,
            short_url,
        })
    }

    /// Same long URL under a different short code.
    pub fn with_short_url(self, short_url: impl Into<String>) -> Result<Self, AppError> {
        Self::new(self.long_url, short_url)
    }

    pub fn long_url(&self) -> &str {
        &self.long_url
    }

    pub fn short_url(&self) -> &str {
        &self.short_url
    }
}

/// Partial update for an existing record.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPatch {
    pub long_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UrlPatch {
    pub fn is_empty(&self) -> bool {
        self.long_url.is_none() && self.is_active.is_none()
    }
}

/// Which records an access may resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Only active records (redirects).
    ActiveOnly,
    /// Any record regardless of `is_active` (direct retrieval).
    Any,
}

impl AccessScope {
    pub fn admits(self, record: &UrlRecord) -> bool {
        match self {
            AccessScope::ActiveOnly => record.is_active,
            AccessScope::Any => true,
        }
    }
}
