use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    auth::ViewerRole,
    middleware::AuthRoleGuard,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        dashboard_service::{SignupListQuery, SignupPage, SignupStats},
    },
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_signups))
        .route("/stats", get(signup_stats))
        .with_state(state)
}

async fn list_signups(
    State(state): State<Arc<AppState>>,
    _guard: AuthRoleGuard<ViewerRole>,
    Query(query): Query<SignupListQuery>,
) -> ApiResult<SignupPage> {
    let page = ServiceContext::from_state(state.as_ref())
        .dashboard()
        .list(query)
        .await?;
    JsonApiResponse::ok(page)
}

async fn signup_stats(
    State(state): State<Arc<AppState>>,
    _guard: AuthRoleGuard<ViewerRole>,
) -> ApiResult<SignupStats> {
    let stats = ServiceContext::from_state(state.as_ref())
        .dashboard()
        .stats()
        .await?;
    JsonApiResponse::ok(stats)
}
