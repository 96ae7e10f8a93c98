use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{
    prelude::{Signup, Student},
    signup::{self, SignupStatus},
    student,
};

#[derive(Clone)]
pub struct SignupDao {
    db: DatabaseConnection,
}

impl DaoBase for SignupDao {
    type Entity = Signup;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl SignupDao {
    pub async fn create_pending(
        &self,
        student_id: &Uuid,
        training_type: &str,
        reminder_date: &DateTime<FixedOffset>,
    ) -> DaoResult<signup::Model> {
        let model = signup::ActiveModel {
            student_id: Set(*student_id),
            training_type: Set(training_type.to_string()),
            reminder_date: Set(*reminder_date),
            status: Set(SignupStatus::Pending.as_str().to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_pending_for_student(
        &self,
        student_id: &Uuid,
    ) -> DaoResult<Option<signup::Model>> {
        let student_id = *student_id;
        self.find_one(move |query| {
            query
                .filter(signup::Column::StudentId.eq(student_id))
                .filter(signup::Column::Status.eq(SignupStatus::Pending.as_str()))
        })
        .await
    }

    pub async fn list_for_student(&self, student_id: &Uuid) -> DaoResult<Vec<signup::Model>> {
        let student_id = *student_id;
        self.find_all(
            Some((signup::Column::CreatedAt, Order::Desc)),
            move |query| query.filter(signup::Column::StudentId.eq(student_id)),
        )
        .await
    }

    /// Every signup with its student, read in a single statement.
    pub async fn list_with_students(
        &self,
    ) -> DaoResult<Vec<(signup::Model, Option<student::Model>)>> {
        Signup::find()
            .find_also_related(Student)
            .order_by_desc(signup::Column::CreatedAt)
            .order_by_asc(signup::Column::Id)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }
}
