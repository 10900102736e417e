use thiserror::Error;

use super::{AppError, StoreError};

/// Errors related to member management operations
#[derive(Error, Debug)]
pub enum MemberError {
    #[error("member '{id}' not found")]
    NotFoundById { id: String },

    #[error("member with code '{code}' not found")]
    NotFoundByCode { code: String },

    #[error("member '{id}' has been deleted")]
    AlreadyDeleted { id: String },

    #[error("member data failed validation: {errors:?}")]
    ValidationFailed { errors: Vec<String> },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError for MemberError {
    fn error_code(&self) -> &'static str {
        match self {
            MemberError::NotFoundById { .. } => "MEMBER_NOT_FOUND",
            MemberError::NotFoundByCode { .. } => "MEMBER_NOT_FOUND_BY_CODE",
            MemberError::AlreadyDeleted { .. } => "MEMBER_ALREADY_DELETED",
            MemberError::ValidationFailed { .. } => "MEMBER_VALIDATION_FAILED",
            MemberError::Store(_) => "MEMBER_STORE_ERROR",
        }
    }

    fn user_message(&self) -> String {
        match self {
            MemberError::NotFoundById { .. } | MemberError::NotFoundByCode { .. } => {
                "Member not found".to_string()
            }
            MemberError::AlreadyDeleted { .. } => "Member has been deleted".to_string(),
            MemberError::ValidationFailed { errors } => errors.join("; "),
            MemberError::Store(_) => "A storage error occurred".to_string(),
        }
    }
}

/// Convenience methods for creating common member errors
impl MemberError {
    pub fn not_found_by_id<S: Into<String>>(id: S) -> Self {
        Self::NotFoundById { id: id.into() }
    }

    pub fn not_found_by_code<S: Into<String>>(code: S) -> Self {
        Self::NotFoundByCode { code: code.into() }
    }

    pub fn already_deleted<S: Into<String>>(id: S) -> Self {
        Self::AlreadyDeleted { id: id.into() }
    }
}
