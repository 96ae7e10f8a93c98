use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    if is_sqlite_url(&cfg.url) {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
    }

    sync_schema(&db).await?;
    Ok(db)
}

pub async fn sync_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("syncing database schema from entities");
    db.get_schema_registry("signup_desk::db::entities::*")
        .sync(db)
        .await?;
    Ok(())
}

fn is_sqlite_url(url: &str) -> bool {
    url.trim().to_ascii_lowercase().starts_with("sqlite:")
}

#[cfg(test)]
mod tests {
    use super::is_sqlite_url;

    #[test]
    fn detects_sqlite_urls() {
        assert!(is_sqlite_url("sqlite::memory:"));
        assert!(is_sqlite_url(" SQLite://data.db?mode=rwc"));
        assert!(!is_sqlite_url("postgres://localhost/signups"));
    }
}
