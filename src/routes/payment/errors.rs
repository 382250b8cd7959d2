use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum PaymentError {
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    InvalidStateError(String),
    #[error("{0}")]
    UnexpectedCustomError(String),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<PaymentError> for GenericError {
    fn from(err: PaymentError) -> GenericError {
        match err {
            PaymentError::NotFoundError(message) => GenericError::NotFoundError(message),
            PaymentError::InvalidStateError(message) => GenericError::InvalidStateError(message),
            PaymentError::UnexpectedCustomError(message) => {
                GenericError::UnexpectedCustomError(message)
            }
            PaymentError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
            PaymentError::UnexpectedError(error) => GenericError::UnexpectedError(error),
        }
    }
}
