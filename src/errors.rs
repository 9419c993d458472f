use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::{self, ContentType}, StatusCode},
    HttpResponse
};
use serde::Serialize;
use validator::ValidationErrors;

const GENERIC_SERVER_ERROR: &str = "Server error. Please try again later.";

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    SpamDetected,
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },
    StorageFailure(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::SpamDetected => write!(f, "Spam detected"),
            AppError::RateLimited { message, .. } => write!(f, "Rate limited: {}", message),
            AppError::StorageFailure(msg) => write!(f, "Storage failure: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Builds a single-field validation error.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    /// Stable tag used in the response envelope and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::SpamDetected => "spam_detected",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::StorageFailure(_) | AppError::InternalError(_) => "server_error",
        }
    }

    /// Message safe to show to the submitter. Server-side failures never leak detail.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(errors) => errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "Invalid submission.".to_string()),
            AppError::SpamDetected => "Spam detected.".to_string(),
            AppError::RateLimited { message, .. } => message.clone(),
            AppError::StorageFailure(_) | AppError::InternalError(_) => {
                GENERIC_SERVER_ERROR.to_string()
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({
            "status": "error",
            "kind": self.kind(),
            "message": self.public_message(),
        });

        match self {
            AppError::ValidationError(errors) => {
                body["details"] = serde_json::json!(errors);
            }
            AppError::RateLimited { retry_after: Some(secs), .. } => {
                body["retry_after"] = serde_json::json!(secs);
            }
            AppError::StorageFailure(detail) | AppError::InternalError(detail) => {
                tracing::error!(kind = self.kind(), error = %detail, "request failed");
            }
            _ => {}
        }

        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());
        if let AppError::RateLimited { retry_after: Some(secs), .. } = self {
            builder.insert_header((header::RETRY_AFTER, secs.to_string()));
        }
        builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::SpamDetected => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        // field_errors() iterates a HashMap
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StorageFailure(format!("Database error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
