use std::{marker::PhantomData, sync::Arc};

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use super::client::client_info;
use crate::{
    auth::{Claims, RequiredRole, Role},
    db::entities::{admin, admin_session},
    error::AppError,
    services::ServiceContext,
    state::AppState,
};

/// The authenticated admin behind a request, resolved from the bearer token,
/// its stored session and the admin row as it is right now.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub admin: admin::Model,
    pub role: Role,
    pub session: admin_session::Model,
    pub claims: Claims,
}

impl FromRequestParts<Arc<AppState>> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthContext>().cloned() {
            return Ok(ctx);
        }

        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        let token = auth
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::authentication("Missing/invalid Authorization header"))?;

        let client = client_info(parts, state.config.general.trust_proxy_headers);
        let services = ServiceContext::from_state(state.as_ref());
        let (claims, session) = services
            .session()
            .authenticate_access(token, client.ip.as_deref())
            .await?;
        let (admin, role) = services.auth().active_admin(&session.admin_id).await?;

        let ctx = AuthContext {
            admin,
            role,
            session,
            claims,
        };
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}

pub type AuthGuard = AuthContext;

pub struct AuthRoleGuard<R: RequiredRole> {
    pub ctx: AuthContext,
    _marker: PhantomData<R>,
}

impl<R> FromRequestParts<Arc<AppState>> for AuthRoleGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;

        if !ctx.role.satisfies(R::required()) {
            return Err(AppError::authorization(format!(
                "Requires {} role or higher",
                R::required()
            )));
        }

        Ok(Self {
            ctx,
            _marker: PhantomData,
        })
    }
}
