pub mod admins;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod public;
mod router;
pub mod sessions;
pub mod students;

pub use router::router;
