use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{admins, audit, auth, dashboard, public, sessions, students};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router(state.clone()))
        .nest("/students", students::router(state.clone()))
        .nest(
            "/admin/auth",
            auth::router(state.clone()).merge(sessions::router(state.clone())),
        )
        .nest("/admin/admins", admins::router(state.clone()))
        .nest("/admin/audit-logs", audit::router(state.clone()))
        .nest("/admin/signups", dashboard::router(state))
}
