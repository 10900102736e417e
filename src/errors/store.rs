use thiserror::Error;

use super::AppError;

/// Errors surfaced by the document store client.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document '{id}' not found in collection '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("value does not serialize to a JSON object document")]
    InvalidDocument,

    #[error("batch write failed at operation {index}: {reason}")]
    BatchFailed { index: usize, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl AppError for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "STORE_NOT_FOUND",
            StoreError::InvalidDocument => "STORE_INVALID_DOCUMENT",
            StoreError::BatchFailed { .. } => "STORE_BATCH_FAILED",
            StoreError::Serialization(_) => "STORE_SERIALIZATION",
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl StoreError {
    pub fn not_found<S: Into<String>>(collection: S, id: S) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
