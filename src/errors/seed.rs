use thiserror::Error;

use super::{AppError, StoreError};

/// Errors raised by the database initializer. Most per-item seed failures are
/// logged and skipped; only the variants below abort a run.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to create system settings: {0}")]
    SettingsSeedFailed(#[source] StoreError),

    #[error("database reset requires explicit confirmation")]
    ResetNotConfirmed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError for SeedError {
    fn error_code(&self) -> &'static str {
        match self {
            SeedError::SettingsSeedFailed(_) => "SEED_SETTINGS_FAILED",
            SeedError::ResetNotConfirmed => "SEED_RESET_NOT_CONFIRMED",
            SeedError::Store(_) => "SEED_STORE_ERROR",
        }
    }
}
