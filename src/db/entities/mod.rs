#[allow(unused_imports)]
pub mod prelude {
    pub use super::admin::Entity as Admin;
    pub use super::admin_session::Entity as AdminSession;
    pub use super::audit_log::Entity as AuditLog;
    pub use super::password_reset::Entity as PasswordReset;
    pub use super::signup::Entity as Signup;
    pub use super::student::Entity as Student;
}

pub mod admin;
pub mod admin_session;
pub mod audit_log;
pub mod password_reset;
pub mod signup;
pub mod student;
