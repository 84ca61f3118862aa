//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{short_url}`
///
/// Each successful redirect increments the record's access count and
/// refreshes `last_accessed`. The response is 302 Found.
///
/// # Errors
///
/// Returns 404 Not Found if the short URL does not exist or is inactive.
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.url_service.resolve_for_redirect(&short_url).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, record.long_url)]))
}
