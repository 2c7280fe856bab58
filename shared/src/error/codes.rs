//! Unified error codes for the storefront API
//!
//! Every failure envelope carries one of these codes next to its message.
//! Codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Order errors
//! - 5xxx: Cart and wishlist errors
//! - 6xxx: Catalog and upload errors
//! - 7xxx: Content errors
//! - 8xxx: Customer data errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so storefront and admin frontends can
/// switch on a number instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Requested page is past the last page
    PageNotFound = 9,
    /// Too many requests from one client
    TooManyRequests = 10,
    /// Route exists but not for this HTTP method
    MethodNotAllowed = 11,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Refresh token was revoked
    TokenRevoked = 1005,
    /// Account is not active
    AccountInactive = 1006,
    /// Email has not been verified
    EmailNotVerified = 1007,
    /// Third-party identity token rejected
    IdentityTokenInvalid = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Caller does not own the resource
    NotResourceOwner = 2003,

    // ==================== 3xxx: Account ====================
    /// User not found
    UserNotFound = 3001,
    /// Email already registered
    EmailAlreadyRegistered = 3002,
    /// Email already verified
    EmailAlreadyVerified = 3003,
    /// Verification code expired
    VerificationCodeExpired = 3004,
    /// Verification code invalid
    VerificationCodeInvalid = 3005,
    /// Too many verification attempts
    TooManyAttempts = 3006,
    /// Password and confirmation differ
    PasswordMismatch = 3007,
    /// Password reset code not verified
    PasswordResetNotVerified = 3008,
    /// Unknown account status value
    InvalidAccountStatus = 3009,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no products
    OrderEmpty = 4002,

    // ==================== 5xxx: Cart & Wishlist ====================
    /// Cart item not found
    CartItemNotFound = 5001,
    /// Product already in cart
    CartItemExists = 5002,
    /// Wishlist item not found
    ListItemNotFound = 5101,
    /// Product already in wishlist
    ListItemExists = 5102,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Unsupported sort key
    InvalidSortKey = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Product variant not found
    VariantNotFound = 6201,
    /// At least one image is required
    ImageRequired = 6501,
    /// Unsupported image format
    UnsupportedImageFormat = 6502,
    /// Image exceeds the size limit
    ImageTooLarge = 6503,
    /// Too many files in one field
    TooManyFiles = 6504,

    // ==================== 7xxx: Content ====================
    /// Banner not found
    BannerNotFound = 7001,
    /// Blog not found
    BlogNotFound = 7101,
    /// Home slide not found
    SlideNotFound = 7201,
    /// Review not found
    ReviewNotFound = 7301,

    // ==================== 8xxx: Customer ====================
    /// Address not found
    AddressNotFound = 8001,
    /// Address is missing fields
    AddressIncomplete = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Timeout error
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Feature not configured on this deployment
    ServiceUnavailable = 9006,
    /// Media upload failed
    MediaUploadFailed = 9101,
    /// Media deletion failed
    MediaDeleteFailed = 9102,
    /// Email delivery failed
    EmailDeliveryFailed = 9201,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::PageNotFound => "Page not found",
            ErrorCode::TooManyRequests => "Too many requests, please try again later",
            ErrorCode::MethodNotAllowed => "Method not allowed",

            // Auth
            ErrorCode::NotAuthenticated => "Provide token",
            ErrorCode::InvalidCredentials => "Check your password",
            ErrorCode::TokenExpired => "Token is expired",
            ErrorCode::TokenInvalid => "Invalid Token",
            ErrorCode::TokenRevoked => "Token has been revoked",
            ErrorCode::AccountInactive => "Contact to Admin",
            ErrorCode::EmailNotVerified => {
                "Your Email is not verify yet please verify your email first"
            }
            ErrorCode::IdentityTokenInvalid => "Identity token could not be verified",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Access denied! Only admins can access this resource",
            ErrorCode::NotResourceOwner => "You don't have permission to modify this resource",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailAlreadyRegistered => {
                "A user with this email has already been registered."
            }
            ErrorCode::EmailAlreadyVerified => "This email is already verified.",
            ErrorCode::VerificationCodeExpired => "OTP has expired. Please request a new one.",
            ErrorCode::VerificationCodeInvalid => "The OTP you entered is incorrect.",
            ErrorCode::TooManyAttempts => "Too many attempts. Please request a new OTP.",
            ErrorCode::PasswordMismatch => "New password and confirm password must be the same",
            ErrorCode::PasswordResetNotVerified => "Verify the OTP before resetting the password",
            ErrorCode::InvalidAccountStatus => "Invalid account status",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no products",

            // Cart & Wishlist
            ErrorCode::CartItemNotFound => "The product in the cart is not found",
            ErrorCode::CartItemExists => "Item already in Cart",
            ErrorCode::ListItemNotFound => "The item with this given id was not found",
            ErrorCode::ListItemExists => "Item already in my list",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::InvalidSortKey => "Unsupported sort key",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::VariantNotFound => "Variant not found",
            ErrorCode::ImageRequired => "At least one image is required",
            ErrorCode::UnsupportedImageFormat => "Unsupported image format",
            ErrorCode::ImageTooLarge => "Image is too large",
            ErrorCode::TooManyFiles => "Too many files",

            // Content
            ErrorCode::BannerNotFound => "Banner not found",
            ErrorCode::BlogNotFound => "Blog not found",
            ErrorCode::SlideNotFound => "Slide not found",
            ErrorCode::ReviewNotFound => "Review not found",

            // Customer
            ErrorCode::AddressNotFound => "Address not found",
            ErrorCode::AddressIncomplete => "All fields are required",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ServiceUnavailable => "Service is not available",
            ErrorCode::MediaUploadFailed => "Image upload failed",
            ErrorCode::MediaDeleteFailed => "Image deletion failed",
            ErrorCode::EmailDeliveryFailed => "Email delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::PageNotFound),
            10 => Ok(ErrorCode::TooManyRequests),
            11 => Ok(ErrorCode::MethodNotAllowed),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::TokenRevoked),
            1006 => Ok(ErrorCode::AccountInactive),
            1007 => Ok(ErrorCode::EmailNotVerified),
            1008 => Ok(ErrorCode::IdentityTokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::NotResourceOwner),

            // Account
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmailAlreadyRegistered),
            3003 => Ok(ErrorCode::EmailAlreadyVerified),
            3004 => Ok(ErrorCode::VerificationCodeExpired),
            3005 => Ok(ErrorCode::VerificationCodeInvalid),
            3006 => Ok(ErrorCode::TooManyAttempts),
            3007 => Ok(ErrorCode::PasswordMismatch),
            3008 => Ok(ErrorCode::PasswordResetNotVerified),
            3009 => Ok(ErrorCode::InvalidAccountStatus),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),

            // Cart & Wishlist
            5001 => Ok(ErrorCode::CartItemNotFound),
            5002 => Ok(ErrorCode::CartItemExists),
            5101 => Ok(ErrorCode::ListItemNotFound),
            5102 => Ok(ErrorCode::ListItemExists),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::InvalidSortKey),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6201 => Ok(ErrorCode::VariantNotFound),
            6501 => Ok(ErrorCode::ImageRequired),
            6502 => Ok(ErrorCode::UnsupportedImageFormat),
            6503 => Ok(ErrorCode::ImageTooLarge),
            6504 => Ok(ErrorCode::TooManyFiles),

            // Content
            7001 => Ok(ErrorCode::BannerNotFound),
            7101 => Ok(ErrorCode::BlogNotFound),
            7201 => Ok(ErrorCode::SlideNotFound),
            7301 => Ok(ErrorCode::ReviewNotFound),

            // Customer
            8001 => Ok(ErrorCode::AddressNotFound),
            8002 => Ok(ErrorCode::AddressIncomplete),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::ServiceUnavailable),
            9101 => Ok(ErrorCode::MediaUploadFailed),
            9102 => Ok(ErrorCode::MediaDeleteFailed),
            9201 => Ok(ErrorCode::EmailDeliveryFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
