use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::TokenBundle,
    middleware::{ApiJson, AuthGuard, ClientAddr},
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        admin_service::AdminView,
        auth_service::{LoginOutcome, RESET_REQUESTED_MESSAGE},
    },
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1 to 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1 to 100 characters"))]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(
        min = 8,
        message = "New password must be at least 8 characters"
    ))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    #[validate(length(
        min = 8,
        message = "New password must be at least 8 characters"
    ))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionsClosed {
    pub sessions_closed: u64,
}

#[derive(Debug, Serialize)]
pub struct ResetIssued {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/logout-all", post(logout_all))
        .route("/me", get(me).put(update_me))
        .route("/change-password", post(change_password))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .with_state(state)
}

async fn login(
    State(state): State<Arc<AppState>>,
    ClientAddr(client): ClientAddr,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<LoginOutcome> {
    body.validate()?;
    let outcome = ServiceContext::from_state(state.as_ref())
        .auth()
        .login(&body.email, &body.password, &client)
        .await?;
    JsonApiResponse::with_message("Login successful", outcome)
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    ClientAddr(client): ClientAddr,
    ApiJson(body): ApiJson<RefreshRequest>,
) -> ApiResult<TokenBundle> {
    body.validate()?;
    let tokens = ServiceContext::from_state(state.as_ref())
        .auth()
        .refresh(&body.refresh_token, &client)
        .await?;
    JsonApiResponse::with_message("Token refreshed", tokens)
}

async fn logout(State(state): State<Arc<AppState>>, ctx: AuthGuard) -> ApiResult<()> {
    ServiceContext::from_state(state.as_ref())
        .session()
        .close(&ctx.session.id)
        .await?;
    JsonApiResponse::with_message("Logged out", ())
}

async fn logout_all(
    State(state): State<Arc<AppState>>,
    ctx: AuthGuard,
) -> ApiResult<SessionsClosed> {
    let sessions_closed = ServiceContext::from_state(state.as_ref())
        .session()
        .close_all(&ctx.admin.id)
        .await?;
    JsonApiResponse::with_message("Logged out everywhere", SessionsClosed { sessions_closed })
}

async fn me(ctx: AuthGuard) -> ApiResult<AdminView> {
    JsonApiResponse::ok(ctx.admin.into())
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    ctx: AuthGuard,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> ApiResult<AdminView> {
    body.validate()?;
    let admin = ServiceContext::from_state(state.as_ref())
        .auth()
        .update_profile(&ctx.admin.id, body.first_name, body.last_name)
        .await?;
    JsonApiResponse::with_message("Profile updated", admin)
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    ctx: AuthGuard,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> ApiResult<SessionsClosed> {
    body.validate()?;
    let sessions_closed = ServiceContext::from_state(state.as_ref())
        .auth()
        .change_password(
            &ctx.admin,
            &ctx.session.id,
            &body.current_password,
            &body.new_password,
        )
        .await?;
    JsonApiResponse::with_message("Password changed", SessionsClosed { sessions_closed })
}

async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<ResetIssued> {
    body.validate()?;
    let auth = ServiceContext::from_state(state.as_ref()).auth();
    let token = auth.request_password_reset(&body.email).await?;
    let reset_token = token.filter(|_| auth.exposes_reset_token());
    JsonApiResponse::with_message(RESET_REQUESTED_MESSAGE, ResetIssued { reset_token })
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<ResetPasswordRequest>,
) -> ApiResult<()> {
    body.validate()?;
    ServiceContext::from_state(state.as_ref())
        .auth()
        .reset_password(&body.token, &body.new_password)
        .await?;
    JsonApiResponse::with_message("Password has been reset", ())
}
