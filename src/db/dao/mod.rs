pub mod admin_dao;
pub mod admin_session_dao;
pub mod audit_log_dao;
pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod password_reset_dao;
pub mod signup_dao;
pub mod student_dao;

pub use admin_dao::{AdminChanges, AdminDao, NewAdmin};
pub use admin_session_dao::{AdminSessionDao, NewSession, RotatedTokens};
pub use audit_log_dao::{AuditLogDao, NewAuditEntry};
pub use base::{DEFAULT_PAGE_SIZE, DaoBase, MAX_PAGE_SIZE, PaginatedResponse};
pub use base_traits::{
    EntityLabel, HasCreatedAtColumn, HasIdActiveModel, HasIdColumn, TimestampedActiveModel,
};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult, DbErrorKind};
pub use password_reset_dao::PasswordResetDao;
pub use signup_dao::SignupDao;
pub use student_dao::{NewStudent, StudentDao};
