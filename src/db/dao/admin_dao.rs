use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{admin, prelude::Admin};

#[derive(Clone)]
pub struct AdminDao {
    db: DatabaseConnection,
}

impl DaoBase for AdminDao {
    type Entity = Admin;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial update applied by super-admins. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct AdminChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl AdminDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<admin::Model>> {
        let email = email.to_string();
        self.find_one(move |query| query.filter(admin::Column::Email.eq(email)))
            .await
    }

    pub async fn create_admin(&self, new_admin: NewAdmin) -> DaoResult<admin::Model> {
        let model = admin::ActiveModel {
            email: Set(new_admin.email),
            password_hash: Set(new_admin.password_hash),
            role: Set(new_admin.role),
            first_name: Set(new_admin.first_name),
            last_name: Set(new_admin.last_name),
            is_active: Set(true),
            last_login_at: Set(None),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_admins(&self) -> DaoResult<Vec<admin::Model>> {
        self.find_all(Some((admin::Column::CreatedAt, Order::Asc)), |query| query)
            .await
    }

    pub async fn set_last_login(&self, id: &Uuid, at: &DateTime<FixedOffset>) -> DaoResult<()> {
        let at = *at;
        self.update(*id, move |active| {
            active.last_login_at = Set(Some(at));
        })
        .await
        .map(|_| ())
    }

    pub async fn update_password(&self, id: &Uuid, password_hash: &str) -> DaoResult<()> {
        let password_hash = password_hash.to_string();
        self.update(*id, move |active| {
            active.password_hash = Set(password_hash);
        })
        .await
        .map(|_| ())
    }

    pub async fn update_account(
        &self,
        id: &Uuid,
        changes: AdminChanges,
    ) -> DaoResult<admin::Model> {
        self.update(*id, move |active| {
            let AdminChanges {
                first_name,
                last_name,
                role,
                is_active,
            } = changes;
            if let Some(first_name) = first_name {
                active.first_name = Set(Some(first_name));
            }
            if let Some(last_name) = last_name {
                active.last_name = Set(Some(last_name));
            }
            if let Some(role) = role {
                active.role = Set(role);
            }
            if let Some(is_active) = is_active {
                active.is_active = Set(is_active);
            }
        })
        .await
    }
}
