use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::Student, student};

#[derive(Clone)]
pub struct StudentDao {
    db: DatabaseConnection,
}

impl DaoBase for StudentDao {
    type Entity = Student;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl StudentDao {
    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<student::Model>> {
        let email = email.to_string();
        self.find_one(move |query| query.filter(student::Column::Email.eq(email)))
            .await
    }

    pub async fn find_by_phone(&self, phone: &str) -> DaoResult<Option<student::Model>> {
        let phone = phone.to_string();
        self.find_one(move |query| query.filter(student::Column::Phone.eq(phone)))
            .await
    }

    /// Email wins over phone when both are given.
    pub async fn find_by_contact(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> DaoResult<Option<student::Model>> {
        if let Some(email) = email
            && let Some(found) = self.find_by_email(email).await?
        {
            return Ok(Some(found));
        }
        match phone {
            Some(phone) => self.find_by_phone(phone).await,
            None => Ok(None),
        }
    }

    pub async fn create_student(&self, new_student: NewStudent) -> DaoResult<student::Model> {
        let model = student::ActiveModel {
            email: Set(new_student.email),
            phone: Set(new_student.phone),
            first_name: Set(new_student.first_name),
            last_name: Set(new_student.last_name),
            email_opt_out: Set(false),
            sms_opt_out: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_opt_out(
        &self,
        id: &Uuid,
        email_opt_out: Option<bool>,
        sms_opt_out: Option<bool>,
    ) -> DaoResult<student::Model> {
        self.update(*id, move |active| {
            if let Some(value) = email_opt_out {
                active.email_opt_out = Set(value);
            }
            if let Some(value) = sms_opt_out {
                active.sms_opt_out = Set(value);
            }
        })
        .await
    }
}
