//! Errors raised by the credential persistence layer.

use thiserror::Error;

use super::ClientError;

/// Failures of the key/value storage backing the credential store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage content is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

impl From<StorageError> for ClientError {
    fn from(err: StorageError) -> Self {
        Self::storage_unavailable_with_source("凭据存储访问失败", err)
    }
}
