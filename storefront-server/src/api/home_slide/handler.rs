//! Home Slide API Handlers
//!
//! 幻灯片归创建者所有，修改和删除需本人或管理员

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::common::IdsRequest;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{HomeSlide, SlideInput};
use crate::db::repository::HomeSlideRepository;
use crate::utils::extract::{Json, Multipart, Path};
use crate::utils::multipart::FormData;
use crate::utils::upload::{destroy_by_url, upload_required};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
pub struct UploadedImages {
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlRequest {
    #[serde(default)]
    pub image_url: String,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::SlideNotFound)
}

fn required_images(input: SlideInput) -> AppResult<Vec<String>> {
    let images: Vec<String> = input
        .images
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if images.is_empty() {
        return Err(AppError::new(ErrorCode::ImageRequired));
    }
    Ok(images)
}

/// The slide, if `user` may change it
async fn owned_slide(
    repo: &HomeSlideRepository,
    user: &CurrentUser,
    id: &str,
    action: &str,
) -> AppResult<HomeSlide> {
    let slide = repo.find_by_id(id).await?.ok_or_else(not_found)?;
    if !user.can_act_for(&slide.user_id) {
        return Err(AppError::with_message(
            ErrorCode::NotResourceOwner,
            format!("You don't have permission to {} this slide", action),
        ));
    }
    Ok(slide)
}

/// POST /api/homeSlides/uploadImages - 上传图片，返回 URL 列表
pub async fn upload_images(
    State(state): State<ServerState>,
    _user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadedImages>>> {
    let form = FormData::from_multipart(multipart).await?;
    let images = upload_required(state.media.as_ref(), &form.files("images")).await?;
    Ok(Json(ApiResponse::success(UploadedImages { images })))
}

/// POST /api/homeSlides/add
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(input): Json<SlideInput>,
) -> AppResult<Json<ApiResponse<HomeSlide>>> {
    let images = required_images(input)?;
    let slide = HomeSlideRepository::new(state.db.clone())
        .create(images, user.id.clone())
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        "Slide created successfully",
        slide,
    )))
}

/// GET /api/homeSlides - 最新在前
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<HomeSlide>>>> {
    let slides = HomeSlideRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(ApiResponse::success(slides)))
}

/// GET /api/homeSlides/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<HomeSlide>>> {
    let slide = HomeSlideRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(slide)))
}

/// PUT /api/homeSlides/:id - 本人或管理员
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<SlideInput>,
) -> AppResult<Json<ApiResponse<HomeSlide>>> {
    let repo = HomeSlideRepository::new(state.db.clone());
    owned_slide(&repo, &user, &id, "edit").await?;
    let images = required_images(input)?;

    let slide = repo.set_images(&id, images).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Slide updated successfully",
        slide,
    )))
}

/// DELETE /api/homeSlides/:id - 本人或管理员
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repo = HomeSlideRepository::new(state.db.clone());
    let slide = owned_slide(&repo, &user, &id, "delete").await?;
    repo.delete(&slide.id_string()).await?;
    Ok(Json(ApiResponse::message("Slide deleted successfully")))
}

/// POST /api/homeSlides/deleteMultiple
///
/// 管理员全部删除；普通用户只删除自己的，一个都不是自己的则 403
pub async fn delete_multiple(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<IdsRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let ids = payload
        .require()
        .map_err(|_| AppError::validation("No slides selected"))?;
    let repo = HomeSlideRepository::new(state.db.clone());

    if user.is_admin() {
        repo.delete_many(&ids).await?;
        return Ok(Json(ApiResponse::message("Slides deleted successfully")));
    }

    let own: Vec<String> = repo
        .find_many(&ids)
        .await?
        .iter()
        .filter(|s| s.user_id == user.id)
        .map(HomeSlide::id_string)
        .collect();
    if own.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::NotResourceOwner,
            "You don't own any of the selected slides",
        ));
    }

    repo.delete_many(&own).await?;
    Ok(Json(ApiResponse::message(format!(
        "Deleted {} of {} selected slides",
        own.len(),
        ids.len()
    ))))
}

/// DELETE /api/homeSlides/deleteImages - 从 CDN 删除图片
pub async fn delete_image(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(req): Json<ImageUrlRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let url = req.image_url.trim();
    if url.is_empty() {
        return Err(AppError::required("Image URL is required"));
    }
    destroy_by_url(state.media.as_ref(), url).await;
    Ok(Json(ApiResponse::message(
        "Image deleted from Cloudinary successfully",
    )))
}
