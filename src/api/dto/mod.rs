//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies are validated with `validator`; everything is
//! (de)serialized with Serde.

pub mod health;
pub mod pagination;
pub mod url;
