use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

/// Failures of the task and user stores that callers must tell apart.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Invalid(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl StoreError {
    pub fn is_unique_violation(err: &DbErr) -> bool {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            return true;
        }
        match err {
            DbErr::Query(RuntimeErr::SqlxError(e)) | DbErr::Exec(RuntimeErr::SqlxError(e)) => e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::unique_violation;

    #[test]
    fn duplicate_key_is_a_unique_violation() {
        assert!(StoreError::is_unique_violation(&unique_violation("users_email_key")));
    }

    #[test]
    fn other_database_errors_are_not() {
        let err = DbErr::Query(RuntimeErr::Internal("relation does not exist".into()));
        assert!(!StoreError::is_unique_violation(&err));
    }
}
