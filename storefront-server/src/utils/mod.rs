//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - [`extract`] - 返回统一错误信封的 Json / Query / Path / Multipart 提取器
//! - 日志、分页、表单解析、分类树、月度报表、图片上传

pub mod category_tree;
pub mod error;
pub mod extract;
pub mod logger;
pub mod multipart;
pub mod pagination;
pub mod report;
pub mod upload;

// Re-export error types from the error module (which re-exports from shared)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{ok, ok_with_message};
