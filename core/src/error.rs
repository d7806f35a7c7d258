//! Error types surfaced by the domain services.

use thiserror::Error;

/// Failure kinds a caller can see from any public operation.
///
/// Storage and auth failures are caught at each service boundary, logged
/// with their diagnostic detail, and mapped to [`BankError::Backend`] so
/// that no raw error type crosses into caller logic. Nothing here is
/// fatal; every failure is recoverable by re-attempting the action.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("you need to be signed in to do this")]
    AuthRequired,

    #[error("{0}")]
    Validation(String),

    #[error("balance {balance:.2} is below the required {required:.2}")]
    InsufficientFunds { balance: f64, required: f64 },

    #[error("backend error: {0}")]
    Backend(String),
}

impl BankError {
    pub fn validation(message: impl Into<String>) -> Self {
        BankError::Validation(message.into())
    }

    /// Wrap a storage-layer failure, keeping the backend's message.
    pub fn backend(err: anyhow::Error) -> Self {
        BankError::Backend(err.to_string())
    }
}
