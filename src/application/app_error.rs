use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message that may be shown to the caller as-is.
    ///
    /// Only errors raised deliberately by the application have one. Storage
    /// errors, including missing rows and constraint violations, and internal
    /// errors return `None` so their details stay in logs.
    pub fn public_message(&self) -> Option<String> {
        match self {
            AppError::InvalidCredentials => Some(self.to_string()),
            AppError::Database(_) | AppError::Internal(_) => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    DatabaseError,
    InvalidCredentials,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
