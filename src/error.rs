use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::database::StoreError;
use crate::models::application::ApplicationStatus;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Offer closed: {0}")]
    Expired(String),

    #[error("Cannot move application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    fn code(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "bad_request",
            Error::Validation(_) => "validation_failed",
            Error::Unauthorized(_) => "unauthorized",
            Error::Forbidden(_) => "forbidden",
            Error::NotFound(_) => "not_found",
            Error::Conflict(_) => "conflict",
            Error::Expired(_) => "offer_closed",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::Config(_) | Error::Database(_) | Error::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let code = self.code();
        let (status, error_message) = match &self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Some fields are invalid".to_string(),
            ),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Error::Expired(msg) => (StatusCode::GONE, msg.clone()),
            Error::InvalidTransition { .. } => (StatusCode::CONFLICT, self.to_string()),
            Error::Config(_) | Error::Database(_) | Error::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = match &self {
            Error::Validation(errors) => {
                let fields: BTreeMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                json!({ "error": error_message, "code": code, "fields": fields })
            }
            _ => json!({ "error": error_message, "code": code }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Error::NotFound("Resource not found".to_string()),
            StoreError::DuplicateApplication => {
                Error::Conflict("You have already applied to this offer".to_string())
            }
            StoreError::ProfileExists => {
                Error::Conflict("This identity already has a profile".to_string())
            }
            StoreError::OfferClosed => {
                Error::Expired("This offer is no longer accepting applications".to_string())
            }
            StoreError::StaleStatus => Error::Conflict(
                "The application status was changed by someone else, reload and retry".to_string(),
            ),
            StoreError::Database(err) => Error::from(err),
            StoreError::Unavailable(msg) => Error::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value as JsonValue;

    async fn render(err: Error) -> (StatusCode, JsonValue, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        (status, serde_json::from_str(&raw).unwrap(), raw)
    }

    #[tokio::test]
    async fn internal_failures_hide_their_cause() {
        for err in [
            Error::from(StoreError::Unavailable("connection reset".to_string())),
            Error::Database(sqlx::Error::Protocol("connection reset".to_string())),
            Error::Config("connection reset".to_string()),
        ] {
            let (status, body, raw) = render(err).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["code"], "internal");
            assert_eq!(body["error"], "An unexpected error occurred");
            assert!(!raw.contains("connection reset"), "{raw}");
        }
    }

    #[tokio::test]
    async fn bad_request_keeps_its_message() {
        let (status, body, _) = render(Error::BadRequest("unknown variant".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
        assert_eq!(body["error"], "unknown variant");
    }
}
