//! 处理器共用的请求类型和小工具

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::record_id;
use crate::utils::extract::Json;
use crate::utils::multipart::FormData;
use crate::utils::upload::destroy_by_url;
use crate::utils::{ApiResponse, AppError, AppResult};

/// `{ids: [...]}` body of the bulk delete endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdsRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

impl IdsRequest {
    /// Non-empty id list, else 400
    pub fn require(self) -> AppResult<Vec<String>> {
        if self.ids.is_empty() {
            return Err(AppError::validation("Invalid input"));
        }
        Ok(self.ids)
    }
}

/// `{deletedCount}` payload of the bulk delete endpoints
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCount {
    pub deleted_count: usize,
}

impl DeletedCount {
    pub fn new(deleted_count: usize) -> Self {
        Self { deleted_count }
    }
}

/// `?img=<url>` of the image delete endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ImageQuery {
    #[serde(default)]
    pub img: String,
}

/// Run derive-based validation, folding field errors into one 400
pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(|errors| {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        AppError::validation(format!("Invalid fields: {}", fields.join(", ")))
            .with_detail("fields", fields)
    })
}

/// Canonical "table:key" form of a path id
pub fn normalize_id(table: &str, id: &str) -> AppResult<String> {
    Ok(record_id(table, id)?.to_string())
}

/// Image list after a multipart update
///
/// `existingImages` (a JSON string) followed by the uploads. A malformed
/// `existingImages`, or an empty result, keeps the stored images.
pub fn merge_images(form: &FormData, stored: &[String], uploaded: Vec<String>) -> Vec<String> {
    let existing: Vec<String> = match form.text("existingImages") {
        Some(_) => form.json_or("existingImages", stored.to_vec()),
        None => Vec::new(),
    };
    let merged: Vec<String> = existing.into_iter().chain(uploaded).collect();
    if merged.is_empty() {
        stored.to_vec()
    } else {
        merged
    }
}

/// DELETE .../deleteImage?img= - 从 CDN 删除图片
///
/// CDN 失败只记录日志，不影响响应
pub async fn delete_image(state: &ServerState, query: ImageQuery) -> AppResult<Json<ApiResponse<()>>> {
    let img = query.img.trim();
    if img.is_empty() {
        return Err(AppError::validation("Provide img"));
    }
    destroy_by_url(state.media.as_ref(), img).await;
    Ok(Json(ApiResponse::message("Image removed")))
}
