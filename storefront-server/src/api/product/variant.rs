//! 商品规格表 (RAM / 重量 / 尺寸) 处理器
//!
//! 三张表结构相同，处理器按 [`VariantRoute`] 泛型复用。

use axum::extract::State;

use crate::api::common::{DeletedCount, IdsRequest};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{ProductVariant, VariantInput, VariantKind};
use crate::db::repository::VariantRepository;
use crate::utils::extract::{Json, Path};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// Binds a route set to one variant table
pub trait VariantRoute: Send + Sync + 'static {
    const KIND: VariantKind;
}

pub struct Ram;
pub struct Weight;
pub struct Size;

impl VariantRoute for Ram {
    const KIND: VariantKind = VariantKind::Ram;
}

impl VariantRoute for Weight {
    const KIND: VariantKind = VariantKind::Weight;
}

impl VariantRoute for Size {
    const KIND: VariantKind = VariantKind::Size;
}

fn repo<K: VariantRoute>(state: &ServerState) -> VariantRepository {
    VariantRepository::new(state.db.clone(), K::KIND)
}

fn not_found<K: VariantRoute>() -> AppError {
    AppError::with_message(
        ErrorCode::VariantNotFound,
        format!("{} not found", K::KIND.label()),
    )
}

fn required_name(input: VariantInput) -> AppResult<String> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::required("Provide name"));
    }
    Ok(name.to_string())
}

/// POST /api/product/productX/create (管理员)
pub async fn create<K: VariantRoute>(
    State(state): State<ServerState>,
    admin: AdminUser,
    Json(input): Json<VariantInput>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let name = required_name(input)?;
    let variant = repo::<K>(&state).create(name, admin.id.clone()).await?;
    Ok(Json(ApiResponse::success_with_message(
        format!("{} created", K::KIND.label()),
        variant,
    )))
}

/// GET /api/product/ProductX/get
pub async fn list<K: VariantRoute>(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<ProductVariant>>>> {
    let variants = repo::<K>(&state).find_all().await?;
    Ok(Json(ApiResponse::success(variants)))
}

/// GET /api/product/ProductX/:id
pub async fn get_by_id<K: VariantRoute>(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let variant = repo::<K>(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found::<K>)?;
    Ok(Json(ApiResponse::success(variant)))
}

/// PUT /api/product/updateProductX/:id (管理员)
pub async fn update<K: VariantRoute>(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<VariantInput>,
) -> AppResult<Json<ApiResponse<ProductVariant>>> {
    let name = required_name(input)?;
    let repo = repo::<K>(&state);
    repo.find_by_id(&id).await?.ok_or_else(not_found::<K>)?;

    let variant = repo.rename(&id, name).await?;
    Ok(Json(ApiResponse::success_with_message(
        format!("{} updated", K::KIND.label()),
        variant,
    )))
}

/// DELETE /api/product/productX/:id (管理员)
pub async fn delete<K: VariantRoute>(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    repo::<K>(&state)
        .delete(&id)
        .await?
        .ok_or_else(not_found::<K>)?;
    Ok(Json(ApiResponse::message(format!(
        "{} deleted",
        K::KIND.label()
    ))))
}

/// DELETE /api/product/deleteMultipleProductX (管理员)
pub async fn delete_multiple<K: VariantRoute>(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<IdsRequest>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let ids = payload.require()?;
    let removed = repo::<K>(&state).delete_many(&ids).await?;
    Ok(Json(ApiResponse::success(DeletedCount::new(removed.len()))))
}
