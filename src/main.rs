use std::net::SocketAddr;

use anyhow::Context;

use signup_desk::{
    auth::bootstrap::init_auth,
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    routes::router,
    services::ServiceContext,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging.rust_log);

    let db_cfg = cfg
        .database
        .clone()
        .context("database section is required (set APP_DATABASE__URL)")?;
    let db = connection::connect(&db_cfg).await?;

    let state = AppState::new(cfg, db);
    init_auth(&ServiceContext::from_state(state.as_ref())).await?;

    let addr: SocketAddr = format!("{}:{}", state.config.general.host, state.config.general.port)
        .parse()
        .context("invalid host/port")?;
    tracing::info!("listening on http://{}", addr);

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
