//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation, resolution and lifecycle

pub mod services;
