//! Core domain entities.
//!
//! - [`UrlRecord`] - A shortened URL with its access statistics
//! - [`NewUrlRecord`] - Validated input for inserting a record
//! - [`UrlPatch`] - Partial update of an existing record
//! - [`AccessScope`] - Which records an access may resolve

pub mod url_record;

pub use url_record::{AccessScope, NewUrlRecord, UrlPatch, UrlRecord};
