//! Database error classification helpers.

/// Name of the unique constraint on `urls.short_url`.
pub const SHORT_URL_UNIQUE_CONSTRAINT: &str = "urls_short_url_key";

/// Returns true if `e` is a unique violation of the short URL constraint.
///
/// Creation treats this as a signal to pick a new code and insert again.
pub fn is_unique_violation_on_short_url(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_URL_UNIQUE_CONSTRAINT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert!(!is_unique_violation_on_short_url(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation_on_short_url(&sqlx::Error::PoolTimedOut));
    }
}
