use crate::services::conflict::Conflict;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{0}")]
    Conflict(Conflict),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("unknown status: {0}")]
    InvalidStatus(String),

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation { field, message: message.into() }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::NotFound { entity, id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
