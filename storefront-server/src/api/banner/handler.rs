//! Banner API Handlers

use axum::{
    extract::State,
    http::StatusCode,
};
use serde::Serialize;

use crate::api::common::{DeletedCount, IdsRequest, merge_images};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Banner, BannerUpdate};
use crate::db::repository::BannerRepository;
use crate::utils::extract::{Json, Multipart, Path, Query};
use crate::utils::multipart::FormData;
use crate::utils::pagination::{PageQuery, Paged};
use crate::utils::upload::{destroy_all, upload_all, upload_required};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannersCount {
    pub banners_count: u64,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::BannerNotFound)
}

fn price_from_form(form: &FormData) -> AppResult<Option<f64>> {
    match form.f64("price")? {
        Some(p) if p < 0.0 => Err(AppError::validation("Price must not be negative")),
        other => Ok(other),
    }
}

/// POST /api/bannerV1/createBanner - 创建横幅，至少一张图片 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    admin: AdminUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Banner>>)> {
    let form = FormData::from_multipart(multipart).await?;
    let price = price_from_form(&form)?.unwrap_or(0.0);
    let images = upload_required(state.media.as_ref(), &form.files("images")).await?;

    let banner = BannerRepository::new(state.db.clone())
        .create(Banner {
            banner_title: form.string("bannerTitle").unwrap_or_default(),
            images,
            cat_name: form.string("catName").unwrap_or_default(),
            cat_id: form
                .string("CatId")
                .or_else(|| form.string("catId"))
                .unwrap_or_default(),
            sub_cat_id: form.string("subCatId").unwrap_or_default(),
            sub_cat: form.string("subCat").unwrap_or_default(),
            third_sub_cat: form.string("thirdsubCat").unwrap_or_default(),
            third_sub_cat_id: form.string("thirdsubCatId").unwrap_or_default(),
            price,
            align_info: form.string("alignInfo").unwrap_or_default(),
            user_id: admin.id.clone(),
            ..Default::default()
        })
        .await?;

    tracing::info!(banner_id = %banner.id_string(), "Banner created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Banner created successfully",
            banner,
        )),
    ))
}

/// GET /api/bannerV1/getAllBanners?page=&perPage= - 最新在前
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<Paged<Banner>>>> {
    let page = query.resolve();
    let (items, total) = BannerRepository::new(state.db.clone())
        .find_page(page.per_page, page.offset())
        .await?;
    page.check(total)?;
    Ok(Json(ApiResponse::success(Paged::new(items, total, page))))
}

/// GET /api/bannerV1/getBannersCount
pub async fn count(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<BannersCount>>> {
    let banners_count = BannerRepository::new(state.db.clone()).count().await?;
    Ok(Json(ApiResponse::success(BannersCount { banners_count })))
}

/// GET /api/bannerV1/getBannersByCatId/:id
pub async fn by_cat_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Banner>>>> {
    let banners = BannerRepository::new(state.db.clone())
        .find_by_cat_id(&id)
        .await?;
    Ok(Json(ApiResponse::success(banners)))
}

/// GET /api/bannerV1/getBannersBySubCatId/:id
pub async fn by_sub_cat_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Banner>>>> {
    let banners = BannerRepository::new(state.db.clone())
        .find_by_sub_cat_id(&id)
        .await?;
    Ok(Json(ApiResponse::success(banners)))
}

/// GET /api/bannerV1/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Banner>>> {
    let banner = BannerRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(banner)))
}

/// PUT /api/bannerV1/updateBanner/:id - 更新横幅 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Banner>>> {
    let repo = BannerRepository::new(state.db.clone());
    let current = repo.find_by_id(&id).await?.ok_or_else(not_found)?;

    let form = FormData::from_multipart(multipart).await?;
    let price = price_from_form(&form)?;
    let uploaded = upload_all(state.media.as_ref(), &form.files("images")).await?;

    let update = BannerUpdate {
        banner_title: form.string("bannerTitle"),
        images: merge_images(&form, &current.images, uploaded),
        cat_name: form.string("catName"),
        cat_id: form.string("CatId").or_else(|| form.string("catId")),
        sub_cat_id: form.string("subCatId"),
        sub_cat: form.string("subCat"),
        third_sub_cat: form.string("thirdsubCat"),
        third_sub_cat_id: form.string("thirdsubCatId"),
        price,
        align_info: form.string("alignInfo"),
        updated_at: 0,
    };
    let banner = repo.update(&id, update).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Banner updated successfully",
        banner,
    )))
}

/// DELETE /api/bannerV1/:id - 删除横幅及图片 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let removed = BannerRepository::new(state.db.clone())
        .delete(&id)
        .await?
        .ok_or_else(not_found)?;
    destroy_all(state.media.as_ref(), &removed.images).await;
    Ok(Json(ApiResponse::message("Banner deleted successfully")))
}

/// DELETE /api/bannerV1/deleteMultiple (管理员)
pub async fn delete_multiple(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<IdsRequest>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let ids = payload.require()?;
    let removed = BannerRepository::new(state.db.clone())
        .delete_many(&ids)
        .await?;
    let images: Vec<String> = removed.iter().flat_map(|b| b.images.clone()).collect();
    destroy_all(state.media.as_ref(), &images).await;
    Ok(Json(ApiResponse::success_with_message(
        "Banners deleted successfully",
        DeletedCount::new(removed.len()),
    )))
}
