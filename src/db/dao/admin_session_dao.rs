use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{admin_session, prelude::AdminSession};

#[derive(Clone)]
pub struct AdminSessionDao {
    db: DatabaseConnection,
}

impl DaoBase for AdminSessionDao {
    type Entity = AdminSession;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<FixedOffset>,
    pub expires_at: DateTime<FixedOffset>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RotatedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<FixedOffset>,
    pub expires_at: DateTime<FixedOffset>,
}

impl AdminSessionDao {
    /// Inserts a session under a caller-chosen id so the id can be embedded in
    /// the tokens before the row exists.
    pub async fn create_session(&self, session: NewSession) -> DaoResult<admin_session::Model> {
        let model = admin_session::ActiveModel {
            admin_id: Set(session.admin_id),
            access_token: Set(session.access_token),
            refresh_token: Set(session.refresh_token),
            access_expires_at: Set(session.access_expires_at),
            expires_at: Set(session.expires_at),
            ip_address: Set(session.ip_address),
            user_agent: Set(session.user_agent),
            last_used_at: Set(chrono::Utc::now().fixed_offset()),
            ..Default::default()
        };
        self.create_with_id(session.id, model).await
    }

    pub async fn find_by_access_token(
        &self,
        token: &str,
    ) -> DaoResult<Option<admin_session::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(admin_session::Column::AccessToken.eq(token)))
            .await
    }

    pub async fn find_by_refresh_token(
        &self,
        token: &str,
    ) -> DaoResult<Option<admin_session::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(admin_session::Column::RefreshToken.eq(token)))
            .await
    }

    pub async fn rotate(
        &self,
        id: &Uuid,
        tokens: RotatedTokens,
    ) -> DaoResult<admin_session::Model> {
        let now = chrono::Utc::now().fixed_offset();
        self.update(*id, move |active| {
            active.access_token = Set(tokens.access_token);
            active.refresh_token = Set(tokens.refresh_token);
            active.access_expires_at = Set(tokens.access_expires_at);
            active.expires_at = Set(tokens.expires_at);
            active.last_used_at = Set(now);
        })
        .await
    }

    pub async fn list_for_admin(&self, admin_id: &Uuid) -> DaoResult<Vec<admin_session::Model>> {
        let admin_id = *admin_id;
        self.find_all(
            Some((admin_session::Column::CreatedAt, Order::Desc)),
            move |query| query.filter(admin_session::Column::AdminId.eq(admin_id)),
        )
        .await
    }

    /// Deletes one session only if it belongs to `admin_id`.
    pub async fn delete_owned(&self, admin_id: &Uuid, session_id: &Uuid) -> DaoResult<bool> {
        let deleted = self
            .delete_where(
                Condition::all()
                    .add(admin_session::Column::Id.eq(*session_id))
                    .add(admin_session::Column::AdminId.eq(*admin_id)),
            )
            .await?;
        Ok(deleted > 0)
    }

    pub async fn delete_all_for_admin(&self, admin_id: &Uuid) -> DaoResult<u64> {
        self.delete_where(Condition::all().add(admin_session::Column::AdminId.eq(*admin_id)))
            .await
    }

    pub async fn delete_all_for_admin_except(
        &self,
        admin_id: &Uuid,
        keep: &Uuid,
    ) -> DaoResult<u64> {
        self.delete_where(
            Condition::all()
                .add(admin_session::Column::AdminId.eq(*admin_id))
                .add(admin_session::Column::Id.ne(*keep)),
        )
        .await
    }

    /// Removes exactly the rows with `expires_at < now`.
    pub async fn delete_expired(&self, now: &DateTime<FixedOffset>) -> DaoResult<u64> {
        self.delete_where(Condition::all().add(admin_session::Column::ExpiresAt.lt(*now)))
            .await
    }
}
