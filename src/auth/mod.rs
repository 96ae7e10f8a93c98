pub mod bootstrap;
pub mod jwt;
pub mod password;
mod types;

pub use types::{
    AdminRole, Claims, RequiredRole, Role, SuperAdminRole, TokenBundle, TokenKind, ViewerRole,
};
