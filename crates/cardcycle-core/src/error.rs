use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Card not found: {0}")]
    CardNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Installment purchase not found: {0}")]
    InstallmentNotFound(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Malformed import: {0}")]
    MalformedImport(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Whether the error only signals a missing card, transaction or target.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::CardNotFound(_)
                | CoreError::TransactionNotFound(_)
                | CoreError::InstallmentNotFound(_)
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
