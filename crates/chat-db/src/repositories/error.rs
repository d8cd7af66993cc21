//! Error handling utilities for repositories

use chat_core::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
///
/// Pool exhaustion is reported as the store being unavailable; everything
/// else is a database error.
pub fn map_db_error(e: SqlxError) -> DomainError {
    match e {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed => {
            DomainError::StoreUnavailable(e.to_string())
        }
        other => DomainError::DatabaseError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            map_db_error(SqlxError::PoolTimedOut),
            DomainError::StoreUnavailable(_)
        ));
        assert!(matches!(
            map_db_error(SqlxError::RowNotFound),
            DomainError::DatabaseError(_)
        ));
    }
}
