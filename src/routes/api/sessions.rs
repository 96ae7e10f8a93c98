use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::SuperAdminRole,
    middleware::{AuthGuard, AuthRoleGuard},
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, session_service::SessionList},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct SweepResult {
    pub deleted: u64,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/sweep", post(sweep_sessions))
        .route("/sessions/{id}", delete(revoke_session))
        .with_state(state)
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
    ctx: AuthGuard,
) -> ApiResult<SessionList> {
    let sessions = ServiceContext::from_state(state.as_ref())
        .session()
        .list_with_counts(&ctx.admin.id, Some(&ctx.session.id))
        .await?;
    JsonApiResponse::ok(sessions)
}

async fn revoke_session(
    State(state): State<Arc<AppState>>,
    ctx: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ServiceContext::from_state(state.as_ref())
        .session()
        .revoke(&ctx.admin.id, &id)
        .await?;
    JsonApiResponse::with_message("Session revoked", ())
}

async fn sweep_sessions(
    State(state): State<Arc<AppState>>,
    AuthRoleGuard { ctx, .. }: AuthRoleGuard<SuperAdminRole>,
) -> ApiResult<SweepResult> {
    let services = ServiceContext::from_state(state.as_ref());
    let deleted = services.session().sweep_expired().await?;
    services
        .audit()
        .record(
            Some(ctx.admin.id),
            "sessions.sweep",
            "admin_session",
            None,
            Some(serde_json::json!({ "deleted": deleted, "trigger": "manual" })),
        )
        .await?;
    JsonApiResponse::with_message("Expired sessions removed", SweepResult { deleted })
}
