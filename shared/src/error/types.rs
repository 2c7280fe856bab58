//! Error types and the response envelope

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Handlers return this for every failure. It renders as the standard
/// envelope with `success: false, error: true` and the HTTP status mapped
/// from [`ErrorCode`].
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a required-field error
    pub fn required(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::RequiredField, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Page past the end of a paginated listing
    pub fn page_not_found() -> Self {
        Self::new(ErrorCode::PageNotFound)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an unauthorized error (alias for not_authenticated)
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an admin-required error
    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a rate-limited error
    pub fn too_many_requests() -> Self {
        Self::new(ErrorCode::TooManyRequests)
    }
}

/// Unified API response envelope
///
/// ```json
/// { "success": true, "error": false, "message": "...", "data": { ... } }
/// ```
///
/// Failures add `code` (see [`ErrorCode`]) and optional `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub error: bool,
    /// Human-readable message
    pub message: String,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error code, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Additional error details, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    /// Create a success response with custom message and data
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            error: false,
            message: message.into(),
            data: Some(data),
            code: None,
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok() -> Self {
        Self::message("OK")
    }

    /// Create a success response carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            error: false,
            message: message.into(),
            data: None,
            code: None,
            details: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            error: true,
            message: err.message.clone(),
            data: None,
            code: Some(err.code.code()),
            details: err.details.clone(),
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            success: false,
            error: true,
            message: err.message,
            data: None,
            code: Some(err.code.code()),
            details: err.details,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = if self.success {
            http::StatusCode::OK
        } else {
            self.code
                .and_then(|c| ErrorCode::try_from(c).ok())
                .map(|c| c.http_status())
                .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
        };

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::CartItemExists);
        assert_eq!(err.code, ErrorCode::CartItemExists);
        assert_eq!(err.message, "Item already in Cart");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "email")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "email");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::page_not_found().http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::not_authenticated().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::admin_required().http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::invalid_credentials().http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        let err = AppError::not_found("Banner");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Banner not found");
        assert!(err.details.as_ref().unwrap().contains_key("resource"));

        assert_eq!(AppError::database("x").code, ErrorCode::DatabaseError);
        assert_eq!(AppError::forbidden("x").code, ErrorCode::PermissionDenied);
        assert_eq!(AppError::too_many_requests().code, ErrorCode::TooManyRequests);
    }

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success_with_message(
            "Order Placed",
            serde_json::json!({"id": "order:1"}),
        ))
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["error"], false);
        assert_eq!(json["message"], "Order Placed");
        assert_eq!(json["data"]["id"], "order:1");
        assert!(json.get("code").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_message_only_envelope() {
        let json = serde_json::to_value(ApiResponse::message("Logout successful")).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = AppError::new(ErrorCode::ProductNotFound).with_detail("id", "product:1");
        let json = serde_json::to_value(ApiResponse::<()>::error(&err)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], true);
        assert_eq!(json["code"], 6001);
        assert_eq!(json["message"], "Product not found");
        assert_eq!(json["details"]["id"], "product:1");
    }

    #[test]
    fn test_api_response_from_error() {
        let response: ApiResponse<String> = AppError::new(ErrorCode::InternalError).into();
        assert!(!response.success);
        assert_eq!(response.code, Some(9001));
        assert_eq!(response.message, "Internal server error");
    }

    #[test]
    fn test_api_response_deserialize() {
        let json = r#"{"success":true,"error":false,"message":"OK","data":42}"#;
        let response: ApiResponse<i32> = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert!(response.code.is_none());
    }
}
