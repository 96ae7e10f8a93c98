use anyhow::Context;

use crate::services::ServiceContext;

/// Startup work that must finish before the listener binds: seed the
/// configured super admin and drop sessions that expired while down.
pub async fn init_auth(services: &ServiceContext) -> anyhow::Result<()> {
    services.auth().seed_super_admin().await?;

    let swept = services
        .session()
        .sweep_expired()
        .await
        .context("startup session sweep failed")?;
    if swept > 0 {
        services
            .audit()
            .record(
                None,
                "sessions.sweep",
                "admin_session",
                None,
                Some(serde_json::json!({ "deleted": swept, "trigger": "startup" })),
            )
            .await?;
    }
    Ok(())
}
