use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use dockyard_services::StoreError;
use dockyard_shared::ErrorBody;
use std::fmt::Display;
use thiserror::Error;

pub const INTERNAL_ERROR: &str = "Internal server error";

/// Handler-boundary error; every variant renders as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    /// The message is what the client sees; the cause has already been logged.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(public: &str, cause: impl Display) -> Self {
        log::error!("[ERROR] {}: {}", public, cause);
        ApiError::Internal(public.to_string())
    }

    pub fn database_unavailable() -> Self {
        ApiError::ServiceUnavailable("Database not available".to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(msg) => ApiError::BadRequest(msg),
            StoreError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Database(e) => ApiError::internal(INTERNAL_ERROR, e),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbErr, RuntimeErr};

    #[test]
    fn store_errors_map_to_status_codes() {
        let cases = [
            (StoreError::Invalid("title is required".into()), StatusCode::BAD_REQUEST),
            (StoreError::NotFound("Task"), StatusCode::NOT_FOUND),
            (StoreError::Conflict("Email already exists".into()), StatusCode::CONFLICT),
            (
                StoreError::Database(DbErr::Conn(RuntimeErr::Internal("down".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (store_err, expected) in cases {
            assert_eq!(ApiError::from(store_err).status_code(), expected);
        }
    }

    #[test]
    fn not_found_message_names_the_resource() {
        let err = ApiError::from(StoreError::NotFound("Task"));
        assert_eq!(err.to_string(), "Task not found");
    }

    #[test]
    fn database_failures_hide_the_cause() {
        let err = ApiError::from(StoreError::Database(DbErr::Custom("password leaked".into())));
        assert_eq!(err.to_string(), INTERNAL_ERROR);
    }
}
