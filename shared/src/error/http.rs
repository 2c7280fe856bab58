//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    ///
    /// Login and verification failures answer 400 rather than 401, which is
    /// what storefront clients already branch on.
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::PageNotFound
            | Self::UserNotFound
            | Self::OrderNotFound
            | Self::CartItemNotFound
            | Self::ListItemNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::VariantNotFound
            | Self::BannerNotFound
            | Self::BlogNotFound
            | Self::SlideNotFound
            | Self::ReviewNotFound
            | Self::AddressNotFound => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::TokenRevoked
            | Self::IdentityTokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired | Self::NotResourceOwner => {
                StatusCode::FORBIDDEN
            }

            // 413 Payload Too Large
            Self::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 405 Method Not Allowed
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 503 Service Unavailable (transient or unconfigured, client can retry)
            Self::NetworkError | Self::TimeoutError | Self::ServiceUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 502 Bad Gateway (upstream media / mail provider rejected the call)
            Self::MediaUploadFailed | Self::MediaDeleteFailed | Self::EmailDeliveryFailed => {
                StatusCode::BAD_GATEWAY
            }

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::PageNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::SlideNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ListItemNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenRevoked.http_status(),
            StatusCode::UNAUTHORIZED
        );
        // Credential failures are plain 400s
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::EmailNotVerified.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_forbidden_status() {
        assert_eq!(ErrorCode::AdminRequired.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::NotResourceOwner.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::MediaUploadFailed.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::ServiceUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::TooManyRequests.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::MethodNotAllowed.http_status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::CartItemExists.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::EmailAlreadyRegistered.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::ImageRequired.http_status(), StatusCode::BAD_REQUEST);
    }
}
