/// Common trait for all custom error types in the application
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Get a stable error code for callers and tests to match on
    fn error_code(&self) -> &'static str;

    /// Get a user-friendly error message
    fn user_message(&self) -> String {
        self.to_string()
    }
}

// Submodules for entity-specific errors
pub mod department;
pub mod member;
pub mod seed;
pub mod store;

pub use department::DepartmentError;
pub use member::MemberError;
pub use seed::SeedError;
pub use store::StoreError;
