use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::JwtKeys,
    config::AppConfig,
    db::dao::DaoContext,
    services::{
        admin_service::AdminService, audit_service::AuditService, auth_service::AuthService,
        dashboard_service::DashboardService, session_service::SessionService,
        signup_service::SignupService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    config: Arc<AppConfig>,
    jwt: JwtKeys,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection, config: Arc<AppConfig>, jwt: JwtKeys) -> Self {
        Self {
            daos: DaoContext::new(db),
            config,
            jwt,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db, Arc::clone(&state.config), state.jwt.clone())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn audit(&self) -> AuditService {
        AuditService::new(self.daos.audit_log())
    }

    pub fn session(&self) -> SessionService {
        SessionService::new(self.daos.session(), self.jwt.clone(), self.config.auth.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.daos.admin(),
            self.daos.password_reset(),
            self.session(),
            self.config.auth.clone(),
        )
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.daos.admin(), self.session(), self.audit())
    }

    pub fn signup(&self) -> SignupService {
        SignupService::new(
            self.daos.student(),
            self.daos.signup(),
            self.config.signup.reminder_offset_days,
        )
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.daos.signup())
    }
}
