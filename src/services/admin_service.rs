use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{Role, password::hash_password},
    db::{
        dao::{AdminChanges, AdminDao, DaoBase, NewAdmin},
        entities::admin,
    },
    error::AppError,
    services::{audit_service::AuditService, session_service::SessionService},
};

/// Admin profile as exposed over the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<admin::Model> for AdminView {
    fn from(model: admin::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            first_name: model.first_name,
            last_name: model.last_name,
            is_active: model.is_active,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAdminInput {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn parse_role(admin: &admin::Model) -> Result<Role, AppError> {
    Role::try_from(admin.role.as_str()).map_err(|_| {
        tracing::error!(admin_id = %admin.id, role = %admin.role, "unknown role stored for admin");
        AppError::internal("Admin account has an unknown role")
    })
}

#[derive(Clone)]
pub struct AdminService {
    admin_dao: AdminDao,
    sessions: SessionService,
    audit: AuditService,
}

impl AdminService {
    pub fn new(admin_dao: AdminDao, sessions: SessionService, audit: AuditService) -> Self {
        Self {
            admin_dao,
            sessions,
            audit,
        }
    }

    pub async fn list(&self) -> Result<Vec<AdminView>, AppError> {
        Ok(self
            .admin_dao
            .list_admins()
            .await?
            .into_iter()
            .map(AdminView::from)
            .collect())
    }

    pub async fn get(&self, id: &Uuid) -> Result<AdminView, AppError> {
        Ok(self.admin_dao.find_by_id(*id).await?.into())
    }

    pub async fn create(&self, actor: &Uuid, input: NewAdminInput) -> Result<AdminView, AppError> {
        let email = normalize_email(&input.email);
        if self.admin_dao.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("An admin with this email already exists"));
        }

        let password_hash = hash_password(&input.password)?;
        let created = self
            .admin_dao
            .create_admin(NewAdmin {
                email,
                password_hash,
                role: input.role.as_str().to_string(),
                first_name: input.first_name,
                last_name: input.last_name,
            })
            .await?;

        self.audit
            .record(
                Some(*actor),
                "admin.create",
                "admin",
                Some(created.id),
                Some(serde_json::json!({ "email": created.email, "role": created.role })),
            )
            .await?;
        Ok(created.into())
    }

    pub async fn update(
        &self,
        actor: &Uuid,
        id: &Uuid,
        update: AdminUpdate,
    ) -> Result<AdminView, AppError> {
        let demotes = update.role.is_some_and(|role| role != Role::SuperAdmin);
        let deactivates = update.is_active == Some(false);
        if actor == id && (demotes || deactivates) {
            return Err(AppError::business(
                "You cannot demote or deactivate your own account",
            ));
        }

        let updated = self
            .admin_dao
            .update_account(
                id,
                AdminChanges {
                    first_name: update.first_name,
                    last_name: update.last_name,
                    role: update.role.map(|role| role.as_str().to_string()),
                    is_active: update.is_active,
                },
            )
            .await?;

        let sessions_closed = if deactivates {
            self.sessions.close_all(id).await?
        } else {
            0
        };

        self.audit
            .record(
                Some(*actor),
                "admin.update",
                "admin",
                Some(updated.id),
                Some(serde_json::json!({
                    "role": updated.role,
                    "is_active": updated.is_active,
                    "sessions_closed": sessions_closed,
                })),
            )
            .await?;
        Ok(updated.into())
    }

    /// Soft delete: the row stays, the account stops working immediately.
    pub async fn deactivate(&self, actor: &Uuid, id: &Uuid) -> Result<AdminView, AppError> {
        if actor == id {
            return Err(AppError::business("You cannot deactivate your own account"));
        }

        let updated = self
            .admin_dao
            .update_account(
                id,
                AdminChanges {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        let sessions_closed = self.sessions.close_all(id).await?;

        self.audit
            .record(
                Some(*actor),
                "admin.deactivate",
                "admin",
                Some(updated.id),
                Some(serde_json::json!({ "sessions_closed": sessions_closed })),
            )
            .await?;
        Ok(updated.into())
    }
}
