use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::{
        dao::{AuditLogDao, NewAuditEntry, PaginatedResponse},
        entities::audit_log,
    },
    error::AppError,
};

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntryView {
    pub id: Uuid,
    pub admin_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<audit_log::Model> for AuditEntryView {
    fn from(model: audit_log::Model) -> Self {
        Self {
            id: model.id,
            admin_id: model.admin_id,
            action: model.action,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            details: model.details,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone)]
pub struct AuditService {
    audit_dao: AuditLogDao,
}

impl AuditService {
    pub fn new(audit_dao: AuditLogDao) -> Self {
        Self { audit_dao }
    }

    pub async fn record(
        &self,
        actor: Option<Uuid>,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        details: Option<serde_json::Value>,
    ) -> Result<(), AppError> {
        self.audit_dao
            .record(NewAuditEntry {
                admin_id: actor,
                action: action.to_string(),
                entity_type: entity_type.to_string(),
                entity_id,
                details,
            })
            .await?;
        tracing::info!(?actor, action, entity_type, ?entity_id, "audit");
        Ok(())
    }

    pub async fn list_recent(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<AuditEntryView>, AppError> {
        let page = self.audit_dao.list_recent(page, page_size).await?;
        Ok(PaginatedResponse {
            data: page.data.into_iter().map(AuditEntryView::from).collect(),
            page: page.page,
            page_size: page.page_size,
            has_next: page.has_next,
        })
    }
}
