use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum PurchaseError {
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    InvalidStateError(String),
    #[error("{0}")]
    UnexpectedCustomError(String),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<PurchaseError> for GenericError {
    fn from(err: PurchaseError) -> GenericError {
        match err {
            PurchaseError::NotFoundError(message) => GenericError::NotFoundError(message),
            PurchaseError::ConflictError(message) => GenericError::ConflictError(message),
            PurchaseError::InvalidStateError(message) => GenericError::InvalidStateError(message),
            PurchaseError::UnexpectedCustomError(message) => {
                GenericError::UnexpectedCustomError(message)
            }
            PurchaseError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
            PurchaseError::UnexpectedError(error) => GenericError::UnexpectedError(error),
        }
    }
}
