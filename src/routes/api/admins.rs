use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{Role, SuperAdminRole},
    error::AppError,
    middleware::{ApiJson, AuthRoleGuard},
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        admin_service::{AdminUpdate, AdminView, NewAdminInput},
    },
    state::AppState,
};

type SuperAdminGuard = AuthRoleGuard<SuperAdminRole>;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Option<String>,
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAdminRequest {
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

fn parse_requested_role(raw: &str) -> Result<Role, AppError> {
    Role::try_from(raw.trim())
        .map_err(|_| AppError::validation_field("role", "Role must be viewer, admin or super_admin"))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route(
            "/{id}",
            get(get_admin).put(update_admin).delete(deactivate_admin),
        )
        .with_state(state)
}

async fn list_admins(
    State(state): State<Arc<AppState>>,
    _guard: SuperAdminGuard,
) -> ApiResult<Vec<AdminView>> {
    let admins = ServiceContext::from_state(state.as_ref()).admin().list().await?;
    JsonApiResponse::ok(admins)
}

async fn create_admin(
    State(state): State<Arc<AppState>>,
    AuthRoleGuard { ctx, .. }: SuperAdminGuard,
    ApiJson(body): ApiJson<CreateAdminRequest>,
) -> ApiResult<AdminView> {
    body.validate()?;
    let role = match body.role.as_deref() {
        Some(raw) => parse_requested_role(raw)?,
        None => Role::Admin,
    };
    let admin = ServiceContext::from_state(state.as_ref())
        .admin()
        .create(
            &ctx.admin.id,
            NewAdminInput {
                email: body.email,
                password: body.password,
                role,
                first_name: body.first_name,
                last_name: body.last_name,
            },
        )
        .await?;
    JsonApiResponse::created("Admin created", admin)
}

async fn get_admin(
    State(state): State<Arc<AppState>>,
    _guard: SuperAdminGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<AdminView> {
    let admin = ServiceContext::from_state(state.as_ref())
        .admin()
        .get(&id)
        .await?;
    JsonApiResponse::ok(admin)
}

async fn update_admin(
    State(state): State<Arc<AppState>>,
    AuthRoleGuard { ctx, .. }: SuperAdminGuard,
    Path(id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateAdminRequest>,
) -> ApiResult<AdminView> {
    body.validate()?;
    let role = body.role.as_deref().map(parse_requested_role).transpose()?;
    let admin = ServiceContext::from_state(state.as_ref())
        .admin()
        .update(
            &ctx.admin.id,
            &id,
            AdminUpdate {
                first_name: body.first_name,
                last_name: body.last_name,
                role,
                is_active: body.is_active,
            },
        )
        .await?;
    JsonApiResponse::with_message("Admin updated", admin)
}

async fn deactivate_admin(
    State(state): State<Arc<AppState>>,
    AuthRoleGuard { ctx, .. }: SuperAdminGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<AdminView> {
    let admin = ServiceContext::from_state(state.as_ref())
        .admin()
        .deactivate(&ctx.admin.id, &id)
        .await?;
    JsonApiResponse::with_message("Admin deactivated", admin)
}
