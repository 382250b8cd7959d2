use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum ExcursionError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ExcursionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<ExcursionError> for GenericError {
    fn from(err: ExcursionError) -> GenericError {
        match err {
            ExcursionError::ValidationError(message) => GenericError::ValidationError(message),
            ExcursionError::NotFoundError(message) => GenericError::NotFoundError(message),
            ExcursionError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
            ExcursionError::UnexpectedError(error) => GenericError::UnexpectedError(error),
        }
    }
}
