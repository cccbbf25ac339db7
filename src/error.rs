use thiserror::Error;

/// Failures surfaced to the menu loops. None of them end the session.
#[derive(Debug, Error)]
pub enum AppError {
    /// The backing statement failed (constraint, syntax, I/O).
    #[error("store operation failed: {0}")]
    StoreOperationFailed(#[from] rusqlite::Error),

    /// Console input rejected before any statement was built.
    #[error("invalid {field}: {value:?}")]
    ValidationOutOfRange { field: &'static str, value: String },

    /// Student account without a matching student record.
    #[error("no student record is linked to this account")]
    NotLinked,
}

impl AppError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        AppError::ValidationOutOfRange {
            field,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
