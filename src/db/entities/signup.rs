use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "signups")]
pub struct Model {
    #[sea_orm(indexed)]
    pub student_id: Uuid,
    pub training_type: String,
    pub reminder_date: DateTimeWithTimeZone,
    pub status: String,
    #[sea_orm(belongs_to, from = "student_id", to = "id", on_delete = "Cascade")]
    pub student: HasOne<super::student::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

/// Reminder delivery state of a signup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SignupStatus {
    Pending,
    Sent,
    Failed,
}

impl SignupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignupStatus::Pending => "pending",
            SignupStatus::Sent => "sent",
            SignupStatus::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for SignupStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(SignupStatus::Pending),
            "sent" => Ok(SignupStatus::Sent),
            "failed" => Ok(SignupStatus::Failed),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SignupStatus;

    #[test]
    fn status_string_roundtrip() {
        for status in [SignupStatus::Pending, SignupStatus::Sent, SignupStatus::Failed] {
            assert_eq!(SignupStatus::try_from(status.as_str()), Ok(status));
        }
        assert!(SignupStatus::try_from("queued").is_err());
    }
}
