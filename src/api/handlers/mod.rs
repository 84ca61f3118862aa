//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod urls;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use urls::{
    create_url_handler, deactivate_url_handler, list_urls_handler, replace_url_handler,
    retrieve_url_handler, update_url_handler,
};
