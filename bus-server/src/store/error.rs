//! Store error types.

/// Errors from the data store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No connection could be established or acquired
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The queried table does not exist
    #[error("table {table} does not exist")]
    MissingTable { table: String },

    /// Query execution failed for another reason
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// A row could not be turned into a domain value
    #[error("invalid row in {table}: {message}")]
    InvalidRow { table: &'static str, message: String },

    /// Fixture data could not be loaded
    #[error("failed to load route data: {message}")]
    Load { message: String },
}

impl StoreError {
    /// Whether the failure was caused by what the caller asked for rather
    /// than by the store itself.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, StoreError::MissingTable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::MissingTable {
            table: "goa_routes".into(),
        };
        assert_eq!(err.to_string(), "table goa_routes does not exist");
        assert!(err.is_caller_error());

        let err = StoreError::Unavailable(sqlx::Error::PoolTimedOut);
        assert!(err.to_string().starts_with("store unavailable"));
        assert!(!err.is_caller_error());

        let err = StoreError::InvalidRow {
            table: "project_info",
            message: "seats_available out of range: -3".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid row in project_info: seats_available out of range: -3"
        );
    }
}
