use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `Json<T>` whose rejections come back as validation errors in the API
/// envelope instead of axum's plain-text 4xx bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => data_error(&err.body_text()),
            JsonRejection::JsonSyntaxError(_) => {
                AppError::validation("Request body is not valid JSON")
            }
            JsonRejection::MissingJsonContentType(_) => {
                AppError::validation("Expected a JSON body with Content-Type: application/json")
            }
            other => AppError::validation(other.body_text()),
        }
    }
}

fn data_error(body_text: &str) -> AppError {
    let detail = body_text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(body_text);
    let detail = strip_location(detail);

    if let Some(field) = missing_field(detail) {
        return AppError::validation_field(field, format!("{field} is required"));
    }

    match detail.split_once(": ") {
        Some((path, reason)) if is_field_path(path) => {
            AppError::validation_field(path, format!("{path}: {reason}"))
        }
        _ => AppError::validation(detail.to_string()),
    }
}

// serde_json appends " at line X column Y"
fn strip_location(detail: &str) -> &str {
    match detail.rfind(" at line ") {
        Some(index) => &detail[..index],
        None => detail,
    }
}

fn missing_field(detail: &str) -> Option<&str> {
    let rest = detail.split_once("missing field `")?.1;
    rest.split_once('`').map(|(field, _)| field)
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::FromRequest,
        http::{Request, header},
    };
    use serde::Deserialize;

    use super::{ApiJson, data_error};
    use crate::error::AppError;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        name: String,
        count: u32,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Payload, AppError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("request should build");
        ApiJson::<Payload>::from_request(request, &())
            .await
            .map(|ApiJson(payload)| payload)
    }

    #[tokio::test]
    async fn missing_field_names_the_field() {
        let err = extract(Some("application/json"), r#"{"count": 1}"#)
            .await
            .expect_err("payload should be rejected");

        assert_eq!(err.kind(), "validation");
        assert_eq!(err.fields()[0].field, "name");
        assert_eq!(err.message(), "name is required");
    }

    #[tokio::test]
    async fn wrong_type_names_the_field() {
        let err = extract(Some("application/json"), r#"{"name": "a", "count": "many"}"#)
            .await
            .expect_err("payload should be rejected");

        assert_eq!(err.kind(), "validation");
        assert_eq!(err.fields()[0].field, "count");
        assert!(!err.message().contains("line"));
    }

    #[tokio::test]
    async fn syntax_errors_and_missing_content_type_are_validation_errors() {
        let err = extract(Some("application/json"), "{not json")
            .await
            .expect_err("payload should be rejected");
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.message(), "Request body is not valid JSON");

        let err = extract(None, r#"{"name": "a", "count": 1}"#)
            .await
            .expect_err("payload should be rejected");
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let payload = extract(Some("application/json"), r#"{"name": "a", "count": 3}"#)
            .await
            .expect("payload should parse");
        assert_eq!(payload.count, 3);
    }

    #[test]
    fn unstructured_detail_keeps_message_without_field() {
        let err = data_error("invalid type: null, expected struct Payload at line 1 column 4");
        assert_eq!(err.kind(), "validation");
        assert!(err.fields().is_empty());
        assert_eq!(err.message(), "invalid type: null, expected struct Payload");
    }
}
