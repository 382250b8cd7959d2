use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::schemas::GenericResponse;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum CustomJWTTokenError {
    #[error("Token expired")]
    Expired,
    #[error("{0}")]
    Invalid(String),
}

impl std::fmt::Debug for CustomJWTTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(thiserror::Error)]
pub enum GenericError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    InvalidJWT(String),
    #[error("{0}")]
    UnauthenticatedError(String),
    #[error("{0}")]
    InsufficientPrivilegeError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    InvalidStateError(String),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error("{0}")]
    UnexpectedCustomError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for GenericError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for GenericError {
    fn status_code(&self) -> StatusCode {
        match self {
            GenericError::ValidationError(_) => StatusCode::BAD_REQUEST,
            GenericError::InvalidJWT(_) => StatusCode::UNAUTHORIZED,
            GenericError::UnauthenticatedError(_) => StatusCode::UNAUTHORIZED,
            GenericError::InsufficientPrivilegeError(_) => StatusCode::FORBIDDEN,
            GenericError::NotFoundError(_) => StatusCode::NOT_FOUND,
            GenericError::ConflictError(_) => StatusCode::CONFLICT,
            GenericError::InvalidStateError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GenericError::DatabaseError(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
            GenericError::UnexpectedCustomError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GenericError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let status_code_str = status_code.as_str();
        let inner_error_msg = match self {
            GenericError::ValidationError(message)
            | GenericError::InvalidJWT(message)
            | GenericError::UnauthenticatedError(message)
            | GenericError::InsufficientPrivilegeError(message)
            | GenericError::NotFoundError(message)
            | GenericError::ConflictError(message)
            | GenericError::InvalidStateError(message)
            | GenericError::UnexpectedCustomError(message) => message.to_string(),
            GenericError::DatabaseError(message, _err) => message.to_string(),
            GenericError::UnexpectedError(inner_error) => inner_error.to_string(),
        };

        HttpResponse::build(status_code).json(GenericResponse::error(
            &inner_error_msg,
            status_code_str,
            Some(()),
        ))
    }
}
