use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::schemas::GenericResponse;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    UnexpectedStringError(String),
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            AuthError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::UnexpectedStringError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let status_code_str = status_code.as_str();
        let inner_error_msg = match self {
            AuthError::InvalidCredentials(inner_error)
            | AuthError::UnexpectedError(inner_error) => inner_error.to_string(),
            AuthError::UnexpectedStringError(message) => message.to_string(),
        };

        HttpResponse::build(status_code).json(GenericResponse::error(
            &inner_error_msg,
            status_code_str,
            Some(()),
        ))
    }
}

#[derive(thiserror::Error)]
pub enum UserRegistrationError {
    #[error("Duplicate email")]
    DuplicateEmail(#[source] anyhow::Error),
    #[error("Duplicate username")]
    DuplicateUsername(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error("{0}")]
    InsufficientPrivilegeError(String),
}

impl std::fmt::Debug for UserRegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UserRegistrationError {
    fn status_code(&self) -> StatusCode {
        match self {
            UserRegistrationError::DuplicateEmail(_) => StatusCode::BAD_REQUEST,
            UserRegistrationError::DuplicateUsername(_) => StatusCode::BAD_REQUEST,
            UserRegistrationError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UserRegistrationError::DatabaseError(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
            UserRegistrationError::InsufficientPrivilegeError(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let status_code_str = status_code.as_str();
        let inner_error_msg = match self {
            UserRegistrationError::DuplicateEmail(inner_error)
            | UserRegistrationError::DuplicateUsername(inner_error)
            | UserRegistrationError::UnexpectedError(inner_error) => inner_error.to_string(),
            UserRegistrationError::DatabaseError(error_msg, _err) => error_msg.clone(),
            UserRegistrationError::InsufficientPrivilegeError(error_msg) => error_msg.to_string(),
        };

        HttpResponse::build(status_code).json(GenericResponse::error(
            &inner_error_msg,
            status_code_str,
            Some(()),
        ))
    }
}
