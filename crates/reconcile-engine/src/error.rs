//! Error types for reconciliation operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
