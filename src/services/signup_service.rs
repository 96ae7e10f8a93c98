use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        dao::{DaoBase, DaoLayerError, NewStudent, SignupDao, StudentDao},
        entities::{signup, student},
    },
    error::{AppError, FieldError},
};

const PHONE_EXTRA_CHARS: &[char] = &[' ', '+', '-', '(', ')'];

/// Public signup form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Training type must be between 1 and 100 characters"
    ))]
    pub training_type: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(min = 7, max = 20, message = "Phone must be 7 to 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "First name is too long"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name is too long"))]
    pub last_name: Option<String>,
}

impl SignupInput {
    /// Trims every field and turns blank optionals into `None`.
    pub fn normalized(self) -> Self {
        Self {
            training_type: self.training_type.trim().to_string(),
            email: non_blank(self.email).map(|email| email.to_ascii_lowercase()),
            phone: non_blank(self.phone),
            first_name: non_blank(self.first_name),
            last_name: non_blank(self.last_name),
        }
    }

    /// Derive rules plus the cross-field and charset checks they cannot express.
    pub fn check(&self) -> Result<(), AppError> {
        let mut fields = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => AppError::from(errors).fields().to_vec(),
        };

        if self.email.is_none() && self.phone.is_none() {
            fields.push(FieldError::new("email", "Either email or phone is required"));
        }
        if let Some(phone) = self.phone.as_deref()
            && !is_phone_charset(phone)
        {
            fields.push(FieldError::new(
                "phone",
                "Phone may only contain digits, spaces and + - ( )",
            ));
        }

        if fields.is_empty() {
            return Ok(());
        }
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Err(AppError::Validation {
            message: fields[0].message.clone(),
            fields,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptOutInput {
    pub email_opt_out: Option<bool>,
    pub sms_opt_out: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub email_opt_out: bool,
    pub sms_opt_out: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl From<student::Model> for StudentView {
    fn from(model: student::Model) -> Self {
        Self {
            full_name: model.full_name(),
            id: model.id,
            email: model.email,
            phone: model.phone,
            first_name: model.first_name,
            last_name: model.last_name,
            email_opt_out: model.email_opt_out,
            sms_opt_out: model.sms_opt_out,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupView {
    pub id: Uuid,
    pub student_id: Uuid,
    pub training_type: String,
    pub reminder_date: DateTime<FixedOffset>,
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<signup::Model> for SignupView {
    fn from(model: signup::Model) -> Self {
        Self {
            id: model.id,
            student_id: model.student_id,
            training_type: model.training_type,
            reminder_date: model.reminder_date,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A signup together with the student it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRecord {
    pub signup: SignupView,
    pub student: StudentView,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentSignups {
    pub student: StudentView,
    pub signups: Vec<SignupView>,
}

#[derive(Clone)]
pub struct SignupService {
    student_dao: StudentDao,
    signup_dao: SignupDao,
    reminder_offset_days: i64,
}

impl SignupService {
    pub fn new(student_dao: StudentDao, signup_dao: SignupDao, reminder_offset_days: i64) -> Self {
        Self {
            student_dao,
            signup_dao,
            reminder_offset_days,
        }
    }

    pub async fn signup(&self, input: SignupInput) -> Result<SignupRecord, AppError> {
        let input = input.normalized();
        input.check()?;

        let student = match self
            .student_dao
            .find_by_contact(input.email.as_deref(), input.phone.as_deref())
            .await?
        {
            Some(existing) => existing,
            None => self
                .student_dao
                .create_student(NewStudent {
                    email: input.email.clone(),
                    phone: input.phone.clone(),
                    first_name: input.first_name.clone(),
                    last_name: input.last_name.clone(),
                })
                .await
                .map_err(duplicate_student_as_conflict)?,
        };

        if self
            .signup_dao
            .find_pending_for_student(&student.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "This student already has a pending signup",
            ));
        }

        let reminder_date = Duration::try_days(self.reminder_offset_days)
            .and_then(|offset| Utc::now().fixed_offset().checked_add_signed(offset))
            .ok_or_else(|| AppError::internal("Reminder offset out of range"))?;
        let signup = self
            .signup_dao
            .create_pending(&student.id, &input.training_type, &reminder_date)
            .await?;

        tracing::info!(
            signup_id = %signup.id,
            student_id = %student.id,
            training_type = %signup.training_type,
            "signup recorded"
        );
        Ok(SignupRecord {
            signup: signup.into(),
            student: student.into(),
        })
    }

    pub async fn get(&self, signup_id: &Uuid) -> Result<SignupRecord, AppError> {
        let signup = self.signup_dao.find_by_id(*signup_id).await?;
        let student = self.student_dao.find_by_id(signup.student_id).await?;
        Ok(SignupRecord {
            signup: signup.into(),
            student: student.into(),
        })
    }

    pub async fn list_for_student(&self, student_id: &Uuid) -> Result<StudentSignups, AppError> {
        let student = self.student_dao.find_by_id(*student_id).await?;
        let signups = self.signup_dao.list_for_student(student_id).await?;
        Ok(StudentSignups {
            student: student.into(),
            signups: signups.into_iter().map(SignupView::from).collect(),
        })
    }

    pub async fn update_opt_out(
        &self,
        student_id: &Uuid,
        input: OptOutInput,
    ) -> Result<StudentView, AppError> {
        if input.email_opt_out.is_none() && input.sms_opt_out.is_none() {
            return Err(AppError::validation(
                "Provide email_opt_out or sms_opt_out",
            ));
        }

        let student = self
            .student_dao
            .update_opt_out(student_id, input.email_opt_out, input.sms_opt_out)
            .await?;
        tracing::info!(
            student_id = %student.id,
            email_opt_out = student.email_opt_out,
            sms_opt_out = student.sms_opt_out,
            "opt-out updated"
        );
        Ok(student.into())
    }
}

/// A concurrent signup can create the same student between lookup and insert.
fn duplicate_student_as_conflict(err: DaoLayerError) -> AppError {
    match AppError::from(err) {
        AppError::Conflict(_) => AppError::conflict("A student with this email or phone already exists"),
        other => other,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_phone_charset(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || PHONE_EXTRA_CHARS.contains(&c))
        && phone.chars().any(|c| c.is_ascii_digit())
}
