//! Implemented for every entity by `#[base_entity]`.

use sea_orm::entity::prelude::DateTimeWithTimeZone;

/// Human-readable singular name, e.g. `"Admin session"`.
pub trait EntityLabel {
    const LABEL: &'static str;
}

pub trait HasCreatedAtColumn: sea_orm::EntityTrait {
    fn created_at_column() -> Self::Column;
}

/// Tie-breaker for paging when the sort column has duplicates.
pub trait HasIdColumn: sea_orm::EntityTrait {
    fn id_column() -> Self::Column;
}

pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}
