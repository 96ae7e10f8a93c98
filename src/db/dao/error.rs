use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

/// Constraint violations the service layer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    UniqueViolation,
    ForeignKeyViolation,
    Other,
}

impl DbErrorKind {
    pub fn classify(err: &DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => return Self::UniqueViolation,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => return Self::ForeignKeyViolation,
            _ => {}
        }

        // Errors that never went through a driver (mocks, custom wrappers)
        // only carry the backend message.
        let message = err.to_string().to_ascii_lowercase();
        if message.contains("unique constraint") || message.contains("duplicate key") {
            Self::UniqueViolation
        } else if message.contains("foreign key constraint") {
            Self::ForeignKeyViolation
        } else {
            Self::Other
        }
    }
}
