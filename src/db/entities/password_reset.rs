use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "password_resets")]
pub struct Model {
    #[sea_orm(indexed)]
    pub admin_id: Uuid,
    // sha256 hex of the token handed to the admin
    #[sea_orm(unique)]
    pub token_hash: String,
    pub expires_at: DateTimeWithTimeZone,
    #[sea_orm(belongs_to, from = "admin_id", to = "id", on_delete = "Cascade")]
    pub admin: HasOne<super::admin::Entity>,
}

impl Model {
    pub fn is_expired_at(&self, now: DateTimeWithTimeZone) -> bool {
        now > self.expires_at
    }
}

impl ActiveModelBehavior for ActiveModel {}
