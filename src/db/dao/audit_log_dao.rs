use sea_orm::{DatabaseConnection, Order, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{audit_log, prelude::AuditLog};

#[derive(Clone)]
pub struct AuditLogDao {
    db: DatabaseConnection,
}

impl DaoBase for AuditLogDao {
    type Entity = AuditLog;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub admin_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

impl AuditLogDao {
    pub async fn record(&self, entry: NewAuditEntry) -> DaoResult<audit_log::Model> {
        let model = audit_log::ActiveModel {
            admin_id: Set(entry.admin_id),
            action: Set(entry.action),
            entity_type: Set(entry.entity_type),
            entity_id: Set(entry.entity_id),
            details: Set(entry.details),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_recent(
        &self,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<audit_log::Model>> {
        self.find(
            page,
            page_size,
            Some((audit_log::Column::CreatedAt, Order::Desc)),
            |query| query,
        )
        .await
    }
}
