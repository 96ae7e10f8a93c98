use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    middleware::ApiJson,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        signup_service::{OptOutInput, SignupInput, SignupRecord, StudentSignups, StudentView},
    },
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/signup/{id}", get(get_signup))
        .route("/{id}/signups", get(list_student_signups))
        .route("/{id}/opt-out", patch(update_opt_out))
        .with_state(state)
}

async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<SignupInput>,
) -> ApiResult<SignupRecord> {
    let record = ServiceContext::from_state(state.as_ref())
        .signup()
        .signup(body)
        .await?;
    JsonApiResponse::created("Signup received", record)
}

async fn get_signup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<SignupRecord> {
    let record = ServiceContext::from_state(state.as_ref())
        .signup()
        .get(&id)
        .await?;
    JsonApiResponse::ok(record)
}

async fn list_student_signups(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StudentSignups> {
    let signups = ServiceContext::from_state(state.as_ref())
        .signup()
        .list_for_student(&id)
        .await?;
    JsonApiResponse::ok(signups)
}

async fn update_opt_out(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<OptOutInput>,
) -> ApiResult<StudentView> {
    let student = ServiceContext::from_state(state.as_ref())
        .signup()
        .update_opt_out(&id, body)
        .await?;
    JsonApiResponse::with_message("Preferences updated", student)
}
