use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::{
        Claims, Role, TokenBundle, TokenKind,
        jwt::{JwtKeys, decode_token, encode_token, make_claims},
    },
    config::AuthConfig,
    db::{
        dao::{AdminSessionDao, DaoBase, NewSession, RotatedTokens},
        entities::admin_session,
    },
    error::AppError,
};

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Where a request came from, as far as the server can tell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub last_used_at: DateTime<FixedOffset>,
    pub access_expires_at: DateTime<FixedOffset>,
    pub expires_at: DateTime<FixedOffset>,
    pub active: bool,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionList {
    pub sessions: Vec<SessionView>,
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

struct MintedTokens {
    bundle: TokenBundle,
    access_expires_at: DateTime<FixedOffset>,
    expires_at: DateTime<FixedOffset>,
}

#[derive(Clone)]
pub struct SessionService {
    session_dao: AdminSessionDao,
    jwt: JwtKeys,
    auth_cfg: AuthConfig,
}

impl SessionService {
    pub fn new(session_dao: AdminSessionDao, jwt: JwtKeys, auth_cfg: AuthConfig) -> Self {
        Self {
            session_dao,
            jwt,
            auth_cfg,
        }
    }

    /// Mints a token pair and persists it as a new session.
    pub async fn open(
        &self,
        admin_id: &Uuid,
        role: Role,
        client: &ClientInfo,
    ) -> Result<(TokenBundle, admin_session::Model), AppError> {
        let session_id = Uuid::new_v4();
        let minted = self.mint(admin_id, &session_id, role)?;
        let session = self
            .session_dao
            .create_session(NewSession {
                id: session_id,
                admin_id: *admin_id,
                access_token: minted.bundle.access_token.clone(),
                refresh_token: minted.bundle.refresh_token.clone(),
                access_expires_at: minted.access_expires_at,
                expires_at: minted.expires_at,
                ip_address: client.ip.clone(),
                user_agent: client.user_agent.clone(),
            })
            .await?;

        tracing::info!(admin_id = %admin_id, session_id = %session.id, "session opened");
        Ok((minted.bundle, session))
    }

    /// Resolves a bearer access token to its live session.
    pub async fn authenticate_access(
        &self,
        access_token: &str,
        client_ip: Option<&str>,
    ) -> Result<(Claims, admin_session::Model), AppError> {
        let claims = decode_token(&self.jwt, access_token, TokenKind::Access)?;
        let session = self
            .session_dao
            .find_by_access_token(access_token)
            .await?
            .ok_or_else(|| AppError::authentication("Session not found or revoked"))?;

        self.ensure_usable(&claims, &session, client_ip)?;
        Ok((claims, session))
    }

    pub async fn find_refreshable(
        &self,
        refresh_token: &str,
        client_ip: Option<&str>,
    ) -> Result<(Claims, admin_session::Model), AppError> {
        let claims = decode_token(&self.jwt, refresh_token, TokenKind::Refresh)?;
        let session = self
            .session_dao
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid refresh token"))?;

        self.ensure_usable(&claims, &session, client_ip)?;
        Ok((claims, session))
    }

    /// Replaces both tokens of an existing session in place.
    pub async fn rotate(
        &self,
        session: &admin_session::Model,
        role: Role,
    ) -> Result<TokenBundle, AppError> {
        let minted = self.mint(&session.admin_id, &session.id, role)?;
        self.session_dao
            .rotate(
                &session.id,
                RotatedTokens {
                    access_token: minted.bundle.access_token.clone(),
                    refresh_token: minted.bundle.refresh_token.clone(),
                    access_expires_at: minted.access_expires_at,
                    expires_at: minted.expires_at,
                },
            )
            .await?;
        Ok(minted.bundle)
    }

    pub async fn close(&self, session_id: &Uuid) -> Result<(), AppError> {
        self.session_dao.delete(*session_id).await?;
        tracing::info!(session_id = %session_id, "session closed");
        Ok(())
    }

    pub async fn close_all(&self, admin_id: &Uuid) -> Result<u64, AppError> {
        let closed = self.session_dao.delete_all_for_admin(admin_id).await?;
        tracing::info!(admin_id = %admin_id, closed, "all sessions closed");
        Ok(closed)
    }

    pub async fn close_others(&self, admin_id: &Uuid, keep: &Uuid) -> Result<u64, AppError> {
        Ok(self
            .session_dao
            .delete_all_for_admin_except(admin_id, keep)
            .await?)
    }

    /// Deletes one of the admin's own sessions.
    pub async fn revoke(&self, admin_id: &Uuid, session_id: &Uuid) -> Result<(), AppError> {
        if !self.session_dao.delete_owned(admin_id, session_id).await? {
            return Err(AppError::not_found("Session not found"));
        }
        Ok(())
    }

    pub async fn list_with_counts(
        &self,
        admin_id: &Uuid,
        current: Option<&Uuid>,
    ) -> Result<SessionList, AppError> {
        let now = Utc::now().fixed_offset();
        let sessions = self
            .session_dao
            .list_for_admin(admin_id)
            .await?
            .into_iter()
            .map(|session| SessionView {
                id: session.id,
                active: session.is_valid_at(now),
                current: current == Some(&session.id),
                ip_address: session.ip_address,
                user_agent: session.user_agent,
                created_at: session.created_at,
                last_used_at: session.last_used_at,
                access_expires_at: session.access_expires_at,
                expires_at: session.expires_at,
            })
            .collect::<Vec<_>>();

        let active = sessions.iter().filter(|session| session.active).count();
        Ok(SessionList {
            total: sessions.len(),
            expired: sessions.len() - active,
            active,
            sessions,
        })
    }

    pub async fn sweep_expired(&self) -> Result<u64, AppError> {
        let now = Utc::now().fixed_offset();
        let deleted = self.session_dao.delete_expired(&now).await?;
        tracing::info!(deleted, "expired sessions swept");
        Ok(deleted)
    }

    pub fn access_ttl_secs(&self) -> usize {
        self.auth_cfg.access_ttl_secs.max(1) as usize
    }

    fn refresh_ttl_secs(&self) -> usize {
        self.auth_cfg
            .refresh_ttl_days
            .max(1)
            .saturating_mul(SECS_PER_DAY) as usize
    }

    fn mint(&self, admin_id: &Uuid, session_id: &Uuid, role: Role) -> Result<MintedTokens, AppError> {
        let access = make_claims(
            admin_id,
            session_id,
            role,
            TokenKind::Access,
            self.access_ttl_secs(),
        )?;
        let refresh = make_claims(
            admin_id,
            session_id,
            role,
            TokenKind::Refresh,
            self.refresh_ttl_secs(),
        )?;

        Ok(MintedTokens {
            access_expires_at: unix_to_datetime(access.exp)?,
            expires_at: unix_to_datetime(refresh.exp)?,
            bundle: TokenBundle {
                access_token: encode_token(&self.jwt, &access)?,
                refresh_token: encode_token(&self.jwt, &refresh)?,
                token_type: "Bearer",
                expires_in: self.access_ttl_secs(),
            },
        })
    }

    fn ensure_usable(
        &self,
        claims: &Claims,
        session: &admin_session::Model,
        client_ip: Option<&str>,
    ) -> Result<(), AppError> {
        if claims.sid != session.id.to_string() || claims.sub != session.admin_id.to_string() {
            return Err(AppError::authentication("Token does not match session"));
        }

        if !session.is_valid_at(Utc::now().fixed_offset()) {
            return Err(AppError::authentication("Session expired"));
        }

        if self.auth_cfg.enforce_session_ip && !ip_matches(session.ip_address.as_deref(), client_ip)
        {
            tracing::warn!(session_id = %session.id, "session used from a different address");
            return Err(AppError::authentication("Session address mismatch"));
        }

        Ok(())
    }
}

/// Unknown addresses on either side never fail the check.
fn ip_matches(stored: Option<&str>, current: Option<&str>) -> bool {
    match (stored, current) {
        (Some(stored), Some(current)) => stored == current,
        _ => true,
    }
}

fn unix_to_datetime(secs: usize) -> Result<DateTime<FixedOffset>, AppError> {
    DateTime::from_timestamp(secs as i64, 0)
        .map(|at| at.fixed_offset())
        .ok_or_else(|| AppError::internal("Token expiry out of range"))
}
