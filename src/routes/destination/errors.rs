use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum DestinationError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for DestinationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<DestinationError> for GenericError {
    fn from(err: DestinationError) -> GenericError {
        match err {
            DestinationError::ValidationError(message) => GenericError::ValidationError(message),
            DestinationError::NotFoundError(message) => GenericError::NotFoundError(message),
            DestinationError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
            DestinationError::UnexpectedError(error) => GenericError::UnexpectedError(error),
        }
    }
}
