use thiserror::Error;

use super::{AppError, StoreError};

/// Errors related to department management operations
#[derive(Error, Debug)]
pub enum DepartmentError {
    #[error("department '{id}' not found")]
    NotFoundById { id: String },

    #[error("department with code '{code}' not found")]
    NotFoundByCode { code: String },

    #[error("department data failed validation: {errors:?}")]
    ValidationFailed { errors: Vec<String> },

    /// A denormalized-counter write could not be applied. Primary operations
    /// treat this as advisory: log, continue, reconcile later.
    #[error("failed to adjust member count for department '{department}' by {delta}")]
    DependencyWriteFailed { department: String, delta: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError for DepartmentError {
    fn error_code(&self) -> &'static str {
        match self {
            DepartmentError::NotFoundById { .. } => "DEPARTMENT_NOT_FOUND",
            DepartmentError::NotFoundByCode { .. } => "DEPARTMENT_NOT_FOUND_BY_CODE",
            DepartmentError::ValidationFailed { .. } => "DEPARTMENT_VALIDATION_FAILED",
            DepartmentError::DependencyWriteFailed { .. } => "DEPARTMENT_DEPENDENCY_WRITE_FAILED",
            DepartmentError::Store(_) => "DEPARTMENT_STORE_ERROR",
        }
    }

    fn user_message(&self) -> String {
        match self {
            DepartmentError::NotFoundById { .. } | DepartmentError::NotFoundByCode { .. } => {
                "Department not found".to_string()
            }
            DepartmentError::ValidationFailed { errors } => errors.join("; "),
            DepartmentError::DependencyWriteFailed { department, .. } => {
                format!("Member count for department {} may be stale", department)
            }
            DepartmentError::Store(_) => "A storage error occurred".to_string(),
        }
    }
}

impl DepartmentError {
    pub fn not_found_by_id<S: Into<String>>(id: S) -> Self {
        Self::NotFoundById { id: id.into() }
    }

    pub fn not_found_by_code<S: Into<String>>(code: S) -> Self {
        Self::NotFoundByCode { code: code.into() }
    }

    pub fn dependency_write_failed<S: Into<String>>(department: S, delta: i64) -> Self {
        Self::DependencyWriteFailed {
            department: department.into(),
            delta,
        }
    }
}
