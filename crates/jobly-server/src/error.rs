//! Error handling for the HTTP layer

use crate::validate::ValidationErrors;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jobly::ModelError;
use serde_json::json;
use thiserror::Error;

/// Result type alias for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors surfaced to API clients
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Option<ValidationErrors>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            errors: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, status = %status, error_code, "request failed");
            "Internal server error".to_string()
        } else {
            tracing::warn!(error = %self, status = %status, error_code, "request rejected");
            self.to_string()
        };

        let mut error = json!({
            "status": status.as_u16(),
            "code": error_code,
            "message": message,
        });
        if let ApiError::BadRequest {
            errors: Some(errors),
            ..
        } = &self
        {
            error["errors"] = json!(errors);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::BadRequest(message) => ApiError::bad_request(message),
            ModelError::NotFound(message) => ApiError::NotFound(message),
            err if err.is_constraint_violation() => ApiError::Conflict(err.to_string()),
            err => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest {
            message: format!("Invalid input: {errors}"),
            errors: Some(errors),
        }
    }
}

impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        ApiError::from(ModelError::from(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{ValidationCode, ValidationError};

    #[test]
    fn model_errors_map_to_statuses() {
        let cases = [
            (ModelError::bad_request("No data"), StatusCode::BAD_REQUEST),
            (ModelError::not_found("No job: 1"), StatusCode::NOT_FOUND),
            (ModelError::ForeignKeyViolation("fk".into()), StatusCode::CONFLICT),
            (ModelError::UniqueViolation("pk".into()), StatusCode::CONFLICT),
            (ModelError::CheckViolation("ck".into()), StatusCode::CONFLICT),
            (ModelError::Connection("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ModelError::decode("id", "bad"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn model_messages_are_kept() {
        let err = ApiError::from(ModelError::not_found("No job: 7"));
        assert_eq!(err.to_string(), "No job: 7");
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn response_body_carries_field_errors() {
        let mut errors = ValidationErrors::default();
        errors.push(ValidationError::new("salary", ValidationCode::Range, "must be >= 0"));

        let response = ApiError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["status"], 400);
        assert_eq!(value["error"]["code"], "BAD_REQUEST");
        assert_eq!(value["error"]["errors"][0]["field"], "salary");
        assert_eq!(value["error"]["errors"][0]["code"], "range");
    }

    #[tokio::test]
    async fn internal_details_are_not_sent_to_clients() {
        let response = ApiError::Internal("password authentication failed".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["message"], "Internal server error");
        assert!(value["error"].get("errors").is_none());
    }
}
