//! Utility functions for code generation and input validation.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - Long URL and short code validation
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
