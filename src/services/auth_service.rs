use anyhow::Context;
use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{
        Role, TokenBundle,
        password::{
            digest_token, generate_reset_token, hash_password, verify_dummy_password,
            verify_password,
        },
    },
    config::AuthConfig,
    db::{
        dao::{AdminChanges, AdminDao, DaoBase, DaoLayerError, NewAdmin, PasswordResetDao},
        entities::admin,
    },
    error::AppError,
    services::{
        admin_service::{AdminView, normalize_email, parse_role},
        session_service::{ClientInfo, SessionService},
    },
};

pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists for that email, a password reset has been issued";

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    #[serde(flatten)]
    pub tokens: TokenBundle,
    pub session_id: Uuid,
    pub admin: AdminView,
}

#[derive(Clone)]
pub struct AuthService {
    admin_dao: AdminDao,
    reset_dao: PasswordResetDao,
    sessions: SessionService,
    auth_cfg: AuthConfig,
}

impl AuthService {
    pub fn new(
        admin_dao: AdminDao,
        reset_dao: PasswordResetDao,
        sessions: SessionService,
        auth_cfg: AuthConfig,
    ) -> Self {
        Self {
            admin_dao,
            reset_dao,
            sessions,
            auth_cfg,
        }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: &ClientInfo,
    ) -> Result<LoginOutcome, AppError> {
        let email = normalize_email(email);
        let Some(admin) = self
            .admin_dao
            .find_by_email(&email)
            .await?
            .filter(|admin| admin.is_active)
        else {
            verify_dummy_password(password);
            return Err(invalid_credentials());
        };

        if !verify_password(password, &admin.password_hash)? {
            tracing::warn!(admin_id = %admin.id, "failed login attempt");
            return Err(invalid_credentials());
        }

        let role = parse_role(&admin)?;
        let now = Utc::now().fixed_offset();
        self.admin_dao.set_last_login(&admin.id, &now).await?;
        let (tokens, session) = self.sessions.open(&admin.id, role, client).await?;

        let mut profile = AdminView::from(admin);
        profile.last_login_at = Some(now);
        Ok(LoginOutcome {
            tokens,
            session_id: session.id,
            admin: profile,
        })
    }

    pub async fn refresh(
        &self,
        refresh_token: &str,
        client: &ClientInfo,
    ) -> Result<TokenBundle, AppError> {
        let (_, session) = self
            .sessions
            .find_refreshable(refresh_token, client.ip.as_deref())
            .await?;
        let (_, role) = self.active_admin(&session.admin_id).await?;
        self.sessions.rotate(&session, role).await
    }

    /// Loads an admin that may still act, with its role as stored now.
    pub async fn active_admin(&self, id: &Uuid) -> Result<(admin::Model, Role), AppError> {
        let admin = match self.admin_dao.find_by_id(*id).await {
            Ok(admin) => admin,
            Err(DaoLayerError::NotFound { .. }) => {
                return Err(AppError::authentication("Account no longer exists"));
            }
            Err(err) => return Err(err.into()),
        };
        if !admin.is_active {
            return Err(AppError::authentication("Account is deactivated"));
        }
        let role = parse_role(&admin)?;
        Ok((admin, role))
    }

    pub async fn update_profile(
        &self,
        admin_id: &Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<AdminView, AppError> {
        let updated = self
            .admin_dao
            .update_account(
                admin_id,
                AdminChanges {
                    first_name,
                    last_name,
                    ..Default::default()
                },
            )
            .await?;
        Ok(updated.into())
    }

    /// Returns how many other sessions were closed.
    pub async fn change_password(
        &self,
        admin: &admin::Model,
        current_session: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<u64, AppError> {
        if !verify_password(current_password, &admin.password_hash)? {
            return Err(AppError::authentication("Current password is incorrect"));
        }
        if current_password == new_password {
            return Err(AppError::validation_field(
                "new_password",
                "New password must differ from the current one",
            ));
        }

        let password_hash = hash_password(new_password)?;
        self.admin_dao
            .update_password(&admin.id, &password_hash)
            .await?;
        let closed = self
            .sessions
            .close_others(&admin.id, current_session)
            .await?;
        tracing::info!(admin_id = %admin.id, closed, "password changed");
        Ok(closed)
    }

    /// Answers identically for unknown and known emails. The raw token is
    /// returned only for delivery by the caller.
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>, AppError> {
        let email = normalize_email(email);
        let Some(admin) = self
            .admin_dao
            .find_by_email(&email)
            .await?
            .filter(|admin| admin.is_active)
        else {
            tracing::debug!("password reset requested for unknown or inactive account");
            return Ok(None);
        };

        let token = generate_reset_token();
        let expires_at = Duration::try_minutes(self.auth_cfg.reset_token_ttl_mins)
            .and_then(|ttl| Utc::now().fixed_offset().checked_add_signed(ttl))
            .ok_or_else(|| AppError::internal("Reset token lifetime out of range"))?;
        self.reset_dao
            .replace_for_admin(&admin.id, &digest_token(&token), &expires_at)
            .await?;
        tracing::info!(admin_id = %admin.id, "password reset issued");

        Ok(Some(token))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let reset = self
            .reset_dao
            .find_by_token_hash(&digest_token(token.trim()))
            .await?
            .ok_or_else(invalid_reset_token)?;

        if reset.is_expired_at(Utc::now().fixed_offset()) {
            self.reset_dao.delete(reset.id).await?;
            return Err(invalid_reset_token());
        }

        let password_hash = hash_password(new_password)?;
        self.reset_dao.delete(reset.id).await?;
        self.admin_dao
            .update_password(&reset.admin_id, &password_hash)
            .await?;
        let closed = self.sessions.close_all(&reset.admin_id).await?;
        tracing::info!(admin_id = %reset.admin_id, closed, "password reset completed");
        Ok(())
    }

    pub fn exposes_reset_token(&self) -> bool {
        self.auth_cfg.expose_reset_token
    }

    pub async fn seed_super_admin(&self) -> anyhow::Result<()> {
        let email = normalize_email(&self.auth_cfg.admin_email);
        if let Some(existing) = self
            .admin_dao
            .find_by_email(&email)
            .await?
        {
            tracing::info!("super admin already present: {}", existing.email);
            return Ok(());
        }

        let password_hash =
            hash_password(&self.auth_cfg.admin_password).context("hashing the seed admin password")?;
        let admin = self
            .admin_dao
            .create_admin(NewAdmin {
                email,
                password_hash,
                role: Role::SuperAdmin.as_str().to_string(),
                first_name: None,
                last_name: None,
            })
            .await?;
        tracing::info!("seeded super admin {}", admin.email);
        Ok(())
    }
}

fn invalid_credentials() -> AppError {
    AppError::authentication("Invalid email or password")
}

fn invalid_reset_token() -> AppError {
    AppError::validation_field("token", "Reset token is invalid or has expired")
}
