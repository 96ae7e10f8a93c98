mod client;
mod guards;
mod json_body;
mod json_error;
mod panic;

pub use client::ClientAddr;
pub use guards::{AuthContext, AuthGuard, AuthRoleGuard};
pub use json_body::ApiJson;
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
