pub mod admin_service;
pub mod audit_service;
pub mod auth_service;
pub mod context;
pub mod dashboard_service;
pub mod session_service;
pub mod signup_service;

pub use context::ServiceContext;
