//! API route configuration.

use crate::api::handlers::{
    create_url_handler, deactivate_url_handler, list_urls_handler, replace_url_handler,
    retrieve_url_handler, update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// URL record routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `GET   /urls`                         - List records (paginated, filterable)
/// - `POST  /urls`                         - Create a short URL
/// - `GET   /urls/{short_url}`             - Retrieve a record (counts as an access)
/// - `PUT   /urls/{short_url}`             - Replace a record's writable fields
/// - `PATCH /urls/{short_url}`             - Partially update a record
/// - `POST  /urls/{short_url}/deactivate`  - Mark a record inactive
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler).post(create_url_handler))
        .route(
            "/urls/{short_url}",
            get(retrieve_url_handler)
                .put(replace_url_handler)
                .patch(update_url_handler),
        )
        .route(
            "/urls/{short_url}/deactivate",
            post(deactivate_url_handler),
        )
}
