//! DTOs for the URL record endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::domain::entities::{UrlPatch, UrlRecord};

/// Request body for `POST /api/urls/`.
///
/// Only `long_url` is read. Any other field the client sends (including
/// `short_url`, `access_count` or `is_active`) is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(
        required(message = "This field is required."),
        length(
            max = 2048,
            message = "URL length exceeds maximum allowed length of 2048 characters."
        ),
        url(message = "Enter a valid URL.")
    )]
    pub long_url: Option<String>,
}

/// Request body for `PATCH /api/urls/{short_url}/`.
///
/// All fields are optional; only provided fields are changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUrlRequest {
    #[validate(
        length(
            max = 2048,
            message = "URL length exceeds maximum allowed length of 2048 characters."
        ),
        url(message = "Enter a valid URL.")
    )]
    pub long_url: Option<String>,

    /// `false` deactivates, `true` reactivates.
    pub is_active: Option<bool>,
}

impl From<UpdateUrlRequest> for UrlPatch {
    fn from(req: UpdateUrlRequest) -> Self {
        UrlPatch {
            long_url: req.long_url,
            is_active: req.is_active,
        }
    }
}

/// Request body for `PUT /api/urls/{short_url}/`.
///
/// Like [`UpdateUrlRequest`] but `long_url` must be present. An omitted
/// `is_active` keeps its current value.
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceUrlRequest {
    #[validate(
        required(message = "This field is required."),
        length(
            max = 2048,
            message = "URL length exceeds maximum allowed length of 2048 characters."
        ),
        url(message = "Enter a valid URL.")
    )]
    pub long_url: Option<String>,

    pub is_active: Option<bool>,
}

impl From<ReplaceUrlRequest> for UrlPatch {
    fn from(req: ReplaceUrlRequest) -> Self {
        UrlPatch {
            long_url: req.long_url,
            is_active: req.is_active,
        }
    }
}

/// Full JSON representation of a URL record.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub id: i64,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: i64,
    pub is_active: bool,
}

impl From<UrlRecord> for UrlResponse {
    fn from(r: UrlRecord) -> Self {
        Self {
            id: r.id,
            long_url: r.long_url,
            short_url: r.short_url,
            created_at: r.created_at,
            last_accessed: r.last_accessed,
            access_count: r.access_count,
            is_active: r.is_active,
        }
    }
}

/// Acknowledgement returned by the deactivate action.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Query parameters for `GET /api/urls/`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ListUrlsQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default)]
    pub search: Option<String>,
}

/// Paginated list of URL records, newest first.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<UrlResponse>,
}
