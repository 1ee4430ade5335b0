//! Error handling utilities for API responses.
//!
//! Provides structured error responses and conversion between service-layer errors
//! and HTTP responses. Includes:
//! - Standard response envelope
//! - ServiceError to HTTP status code mapping
//! - A JSON body extractor whose rejections use the same envelope
//!
//! # Response Format
//! All errors return consistent JSON responses containing:
//! - `message`: Human-readable message
//! - `error.errorType`: Machine-readable error category
//! - `error.details`: Optional field-specific validation errors

use crate::errors::{FieldError, ServiceError};
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Response timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Error half of every handler's result.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    pub fn error(
        message: impl Into<String>,
        error_type: impl Into<String>,
        details: Option<Vec<FieldError>>,
    ) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a successful response that carries only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Builds an error tuple with the standard envelope.
pub fn error_response(
    status: StatusCode,
    error_type: &str,
    message: impl Into<String>,
    details: Option<Vec<FieldError>>,
) -> ApiError {
    (
        status,
        Json(ApiResponse::error(message, error_type, details)),
    )
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    match error {
        ServiceError::Validation { message, details } => {
            let details = (!details.is_empty()).then_some(details);
            error_response(StatusCode::BAD_REQUEST, "validation_error", message, details)
        }
        ServiceError::NotFound { entity, identifier } => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} '{}' not found", entity, identifier),
            None,
        ),
        ServiceError::AlreadyExists { entity, identifier } => error_response(
            StatusCode::BAD_REQUEST,
            "already_exists",
            format!("{} '{}' already exists", entity, identifier),
            None,
        ),
        ServiceError::InvalidCredentials => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_authentication",
            "Invalid authentication",
            None,
        ),
        ServiceError::PermissionDenied { message } => {
            error_response(StatusCode::FORBIDDEN, "permission_denied", message, None)
        }
        ServiceError::InvalidOperation { message } => {
            error_response(StatusCode::BAD_REQUEST, "invalid_operation", message, None)
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {:#}", source);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error",
                None,
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
                None,
            )
        }
    }
}

/// Like [`service_error_to_http`], but reports a missing entity as 400.
///
/// Used by the endpoints whose not-found outcome is a bad request.
pub fn not_found_as_bad_request(error: ServiceError) -> ApiError {
    let (status, body) = service_error_to_http(error);
    if status == StatusCode::NOT_FOUND {
        (StatusCode::BAD_REQUEST, body)
    } else {
        (status, body)
    }
}

/// JSON body extractor that rejects unreadable bodies with a 400 envelope
/// instead of axum's plain-text 415/422 responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                error_response(
                    StatusCode::BAD_REQUEST,
                    "invalid_payload",
                    "Invalid request payload",
                    Some(vec![FieldError::new("body", rejection.body_text())]),
                )
            })?;

        Ok(Self(value))
    }
}
