use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, FieldError};

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// Success envelope: `{success, message, data, timestamp}`.
#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub message: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, "ok", data)
    }

    pub fn with_message(message: impl Into<String>, data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self {
            status,
            success: true,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        })
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Error envelope: `{success: false, error, errors?, timestamp}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn from_error(err: &AppError) -> Self {
        Self {
            success: false,
            error: err.message().to_string(),
            errors: err.fields().to_vec(),
            timestamp: Utc::now(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        log_app_error(&self, status);
        (status, Json(ErrorBody::from_error(&self))).into_response()
    }
}

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
        AppError::Authorization(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::BusinessLogic(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Database { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn log_app_error(err: &AppError, status: StatusCode) {
    if status.is_server_error() {
        match err {
            AppError::Database {
                source: Some(source),
                ..
            } => tracing::error!(
                kind = err.kind(),
                status = status.as_u16(),
                source = %source,
                "{}",
                err.message()
            ),
            _ => tracing::error!(kind = err.kind(), status = status.as_u16(), "{}", err.message()),
        }
    } else {
        tracing::warn!(kind = err.kind(), status = status.as_u16(), "{}", err.message());
    }
}
