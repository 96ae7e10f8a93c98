use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{password_reset, prelude::PasswordReset};

#[derive(Clone)]
pub struct PasswordResetDao {
    db: DatabaseConnection,
}

impl DaoBase for PasswordResetDao {
    type Entity = PasswordReset;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl PasswordResetDao {
    /// Drops every outstanding reset for the admin, then stores the new one.
    pub async fn replace_for_admin(
        &self,
        admin_id: &Uuid,
        token_hash: &str,
        expires_at: &DateTime<FixedOffset>,
    ) -> DaoResult<password_reset::Model> {
        self.delete_for_admin(admin_id).await?;

        let model = password_reset::ActiveModel {
            admin_id: Set(*admin_id),
            token_hash: Set(token_hash.to_string()),
            expires_at: Set(*expires_at),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> DaoResult<Option<password_reset::Model>> {
        let token_hash = token_hash.to_string();
        self.find_one(move |query| {
            query.filter(password_reset::Column::TokenHash.eq(token_hash))
        })
        .await
    }

    pub async fn delete_for_admin(&self, admin_id: &Uuid) -> DaoResult<u64> {
        self.delete_where(Condition::all().add(password_reset::Column::AdminId.eq(*admin_id)))
            .await
    }
}
