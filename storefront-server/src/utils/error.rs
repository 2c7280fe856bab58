//! 统一错误处理
//!
//! 请求级错误统一为 [`AppError`]，各层错误在这里转换：
//!
//! | 来源 | 转换 |
//! |------|------|
//! | [`RepoError`] | NotFound → 404, Duplicate / Validation → 400, Database → 500 |
//! | [`MediaError`] | 502 MediaUploadFailed, 未配置 → 503 |
//! | [`MailError`] | 502 EmailDeliveryFailed |
//! | [`JwtError`] | 401 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Product"))
//!
//! // 返回成功响应
//! Ok(ok_with_message(product, "Product created successfully"))
//! ```

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::auth::JwtError;
use crate::utils::extract::Json;
use crate::db::repository::RepoError;
use crate::services::mailer::MailError;
use crate::services::media::MediaError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::NotConfigured => {
                AppError::with_message(ErrorCode::ServiceUnavailable, err.to_string())
            }
            other => AppError::with_message(ErrorCode::MediaUploadFailed, other.to_string()),
        }
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::with_message(ErrorCode::EmailDeliveryFailed, err.to_string())
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => AppError::token_expired(),
            JwtError::GenerationFailed(msg) | JwtError::ConfigError(msg) => {
                AppError::internal(format!("Token error: {}", msg))
            }
            other => AppError::invalid_token(other.to_string()),
        }
    }
}

/// 请求提取失败 (请求体、查询参数、路径参数)
///
/// 缺少或错误的 Content-Type 为 InvalidRequest，其余为 ValidationFailed，都是 400。
pub fn rejection_error(status: StatusCode, detail: String) -> AppError {
    tracing::debug!(status = %status, detail = %detail, "Request rejected by extractor");
    let code = if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
        ErrorCode::InvalidRequest
    } else {
        ErrorCode::ValidationFailed
    };
    AppError::with_message(code, detail)
}

/// Multipart 解析失败
pub fn multipart_error(err: MultipartError) -> AppError {
    AppError::invalid_request(format!("Multipart error: {}", err))
}

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with a custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
