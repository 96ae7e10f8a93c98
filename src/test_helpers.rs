//! Builders shared by unit and integration tests.

use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, MockDatabase};

use crate::{
    auth::bootstrap::init_auth,
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::connection,
    routes::router,
    services::ServiceContext,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "adminpassword";

/// Config that does not read the process environment.
pub fn test_config() -> AppConfig {
    AppConfig {
        database: Some(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 1,
        }),
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            admin_email: TEST_ADMIN_EMAIL.to_string(),
            admin_password: TEST_ADMIN_PASSWORD.to_string(),
            expose_reset_token: true,
            ..AuthConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Router over a mock connection; only for requests that never reach the DB.
pub fn test_router() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    router(AppState::new(test_config(), db))
}

/// Fresh in-memory SQLite database with the schema synced and the super
/// admin seeded. A single pooled connection keeps the database alive.
pub async fn sqlite_state(cfg: AppConfig) -> anyhow::Result<Arc<AppState>> {
    let db_cfg = cfg
        .database
        .clone()
        .ok_or_else(|| anyhow::anyhow!("test config needs a database section"))?;
    let db = connection::connect(&db_cfg).await?;
    let state = AppState::new(cfg, db);
    init_auth(&ServiceContext::from_state(state.as_ref())).await?;
    Ok(state)
}
