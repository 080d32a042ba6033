use crate::domain::error::DomainError;
use crate::presentation::http::envelope::Envelope;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

pub(crate) const STORAGE_FAILURE_MESSAGE: &str = "something wrong with database";
pub(crate) const DUPLICATE_TITLE_MESSAGE: &str = "Failed to post, duplicated title";

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid body: {0}")]
    Body(#[from] JsonRejection),

    #[error("unauthorized")]
    Unauthorized,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::Domain(err) => match &err {
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                DomainError::AlreadyExists(_) => {
                    (StatusCode::BAD_REQUEST, DUPLICATE_TITLE_MESSAGE.to_string())
                }
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Storage(_) => {
                    error!(error = %err, "storage failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        STORAGE_FAILURE_MESSAGE.to_string(),
                    )
                }
                DomainError::Corrupted(_) => {
                    error!(error = %err, "corrupted post record");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Body(rejection) => (rejection.status(), rejection.body_text()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "session required".to_string()),
        };

        Envelope::message(status, msg).respond(status)
    }
}
