use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_sessions")]
pub struct Model {
    #[sea_orm(indexed)]
    pub admin_id: Uuid,
    #[sea_orm(unique, column_type = "Text")]
    pub access_token: String,
    #[sea_orm(unique, column_type = "Text")]
    pub refresh_token: String,
    pub access_expires_at: DateTimeWithTimeZone,
    #[sea_orm(indexed)]
    pub expires_at: DateTimeWithTimeZone,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub last_used_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "admin_id", to = "id", on_delete = "Cascade")]
    pub admin: HasOne<super::admin::Entity>,
}

impl Model {
    /// A session is valid up to and including its expiry instant.
    pub fn is_valid_at(&self, now: DateTimeWithTimeZone) -> bool {
        now <= self.expires_at
    }
}

impl ActiveModelBehavior for ActiveModel {}
