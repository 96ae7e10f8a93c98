use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{
    auth::SuperAdminRole,
    db::dao::{DEFAULT_PAGE_SIZE, PaginatedResponse},
    middleware::AuthRoleGuard,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, audit_service::AuditEntryView},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/", get(list_audit_logs)).with_state(state)
}

async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    _guard: AuthRoleGuard<SuperAdminRole>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<PaginatedResponse<AuditEntryView>> {
    let entries = ServiceContext::from_state(state.as_ref())
        .audit()
        .list_recent(
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    JsonApiResponse::ok(entries)
}
