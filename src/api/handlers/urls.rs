//! Handlers for the URL record API (create, list, retrieve, update, deactivate).

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::url::{
    CreateUrlRequest, ListUrlsQuery, ReplaceUrlRequest, StatusResponse, UpdateUrlRequest, UrlListResponse,
    UrlResponse,
};
use crate::domain::repositories::UrlFilter;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a new short URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://www.example.com" }
/// ```
///
/// The short code is always generated by the server. Client-supplied
/// `short_url`, `access_count` or `is_active` fields are ignored.
///
/// # Errors
///
/// Returns 400 Bad Request when the body is not JSON, `long_url` is missing,
/// malformed, or longer than 2048 characters.
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let long_url = payload.long_url.unwrap_or_default();
    let record = state.url_service.create(long_url).await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Lists URL records, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?page=1&page_size=25&is_active=true&search=example`
pub async fn list_urls_handler(
    State(state): State<AppState>,
    query: Result<Query<ListUrlsQuery>, QueryRejection>,
) -> Result<Json<UrlListResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        AppError::bad_request(
            "Invalid query parameters",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let page = query.pagination.resolve()?;
    let filter = UrlFilter::new(page.offset, page.limit)
        .with_active(query.is_active)
        .with_search(query.search);

    let (records, total) = state.url_service.list(filter).await?;

    Ok(Json(UrlListResponse {
        pagination: page.meta(total),
        items: records.into_iter().map(UrlResponse::from).collect(),
    }))
}

/// Returns a record and counts the lookup as an access.
///
/// # Endpoint
///
/// `GET /api/urls/{short_url}`
///
/// Inactive records are still returned here; only the redirect path
/// refuses them.
///
/// # Errors
///
/// Returns 404 Not Found if the short URL does not exist.
pub async fn retrieve_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlResponse>, AppError> {
    let record = state.url_service.retrieve(&short_url).await?;
    Ok(Json(record.into()))
}

/// Partially updates a record.
///
/// # Endpoint
///
/// `PATCH /api/urls/{short_url}`
///
/// ```json
/// { "long_url": "https://new-destination.com", "is_active": true }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request on an invalid body, 404 if the record is missing.
pub async fn update_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateUrlRequest>, JsonRejection>,
) -> Result<Json<UrlResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state
        .url_service
        .update(&short_url, payload.into())
        .await?;

    Ok(Json(record.into()))
}

/// Replaces the writable fields of a record.
///
/// # Endpoint
///
/// `PUT /api/urls/{short_url}`
///
/// ```json
/// { "long_url": "https://new-destination.com", "is_active": true }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `long_url` is missing or invalid, 404 if the
/// record is missing.
pub async fn replace_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<ReplaceUrlRequest>, JsonRejection>,
) -> Result<Json<UrlResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state
        .url_service
        .update(&short_url, payload.into())
        .await?;

    Ok(Json(record.into()))
}

/// Marks a record inactive. Repeating the call on an inactive record
/// succeeds with the same response.
///
/// # Endpoint
///
/// `POST /api/urls/{short_url}/deactivate`
///
/// # Errors
///
/// Returns 404 Not Found if the short URL does not exist.
pub async fn deactivate_url_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, AppError> {
    state.url_service.deactivate(&short_url).await?;

    Ok(Json(StatusResponse {
        status: "URL deactivated",
    }))
}
