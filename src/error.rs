use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::db::dao::{DaoLayerError, DbErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every failure a request can end in. The HTTP status is derived from the
/// variant in `response.rs`.
#[derive(Debug)]
pub enum AppError {
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },
    Authentication(String),
    Authorization(String),
    NotFound(String),
    Conflict(String),
    BusinessLogic(String),
    Database {
        message: String,
        source: Option<sea_orm::DbErr>,
    },
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Validation {
            message: message.clone(),
            fields: vec![FieldError::new(field, message)],
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self::BusinessLogic(message.into())
    }

    pub fn database(message: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. } | Self::Database { message, .. } => message,
            Self::Authentication(message)
            | Self::Authorization(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::BusinessLogic(message)
            | Self::Internal(message) => message,
        }
    }

    pub fn fields(&self) -> &[FieldError] {
        match self {
            Self::Validation { fields, .. } => fields,
            _ => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Authentication(_) => "authentication",
            Self::Authorization(_) => "authorization",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::BusinessLogic(_) => "business_logic",
            Self::Database { .. } => "database",
            Self::Internal(_) => "internal",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { entity, .. } => {
                AppError::not_found(format!("{entity} not found"))
            }
            DaoLayerError::InvalidPagination { .. } => AppError::validation(err.to_string()),
            DaoLayerError::Db(db_err) => match DbErrorKind::classify(&db_err) {
                DbErrorKind::UniqueViolation => {
                    AppError::conflict("A record with the same unique value already exists")
                }
                DbErrorKind::ForeignKeyViolation => {
                    AppError::business("Referenced record does not exist")
                }
                DbErrorKind::Other => AppError::database(
                    "database operation failed. Please check the logs for more details",
                    db_err,
                ),
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        flatten_validation_errors(None, &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        let message = fields
            .first()
            .map(|field| field.message.clone())
            .unwrap_or_else(|| "Validation failed".to_string());
        AppError::Validation { message, fields }
    }
}

fn flatten_validation_errors(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    out: &mut Vec<FieldError>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid ({})", error.code));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                flatten_validation_errors(Some(&path), nested, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    flatten_validation_errors(Some(&format!("{path}[{index}]")), nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use uuid::Uuid;
    use validator::Validate;

    use super::AppError;
    use crate::db::dao::DaoLayerError;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Email must be valid"))]
        email: String,
    }

    #[test]
    fn validation_errors_are_flattened_per_field() {
        let payload = Payload {
            name: String::new(),
            email: "nope".to_string(),
        };
        let err = AppError::from(payload.validate().expect_err("payload should be invalid"));

        let fields = err.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "email");
        assert_eq!(fields[0].message, "Email must be valid");
        assert_eq!(fields[1].field, "name");
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = AppError::from(DaoLayerError::NotFound {
            entity: "Admin session",
            id: Uuid::new_v4(),
        });

        assert_eq!(err.message(), "Admin session not found");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn unique_violation_becomes_conflict() {
        let err = AppError::from(DaoLayerError::Db(DbErr::Custom(
            "duplicate key value violates unique constraint \"students_email_key\"".to_string(),
        )));

        assert_eq!(err.kind(), "conflict");
    }

    #[test]
    fn unclassified_db_error_hides_details() {
        let err = AppError::from(DaoLayerError::Db(DbErr::Custom("socket closed".to_string())));

        assert_eq!(err.kind(), "database");
        assert!(!err.message().contains("socket"));
    }
}
