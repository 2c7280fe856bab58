//! Address API Handlers

use axum::extract::State;
use serde::Deserialize;

use crate::api::common::normalize_id;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Address, AddressInput, AddressUpdate};
use crate::db::repository::AddressRepository;
use crate::utils::extract::{Json, Path, Query};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::AddressNotFound)
}

/// POST /api/address/addAddress (别名 /add) - 新增收货地址，八个字段均为必填
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(input): Json<AddressInput>,
) -> AppResult<Json<ApiResponse<Address>>> {
    if !input.is_complete() {
        return Err(AppError::new(ErrorCode::AddressIncomplete));
    }

    let address = AddressRepository::new(state.db.clone())
        .create(Address {
            address_line1: input.address_line1.trim().to_string(),
            city: input.city.trim().to_string(),
            state: input.state.trim().to_string(),
            pincode: input.pincode.trim().to_string(),
            country: input.country.trim().to_string(),
            mobile: input.mobile.trim().to_string(),
            landmark: input.landmark.trim().to_string(),
            address_type: input.address_type.trim().to_string(),
            user_id: user.id.clone(),
            ..Default::default()
        })
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        "Address added successfully",
        address,
    )))
}

/// GET /api/address/get?userId= - 地址列表，查看他人需管理员
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<AddressQuery>,
) -> AppResult<Json<ApiResponse<Vec<Address>>>> {
    let owner = match query.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => normalize_id("user", id)?,
        _ => user.id.clone(),
    };
    if !user.can_act_for(&owner) {
        return Err(AppError::admin_required());
    }

    let addresses = AddressRepository::new(state.db.clone())
        .find_by_user(&owner)
        .await?;
    Ok(Json(ApiResponse::success(addresses)))
}

/// GET /api/address/get/:id - 本人或管理员
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Address>>> {
    let address = AddressRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .filter(|a| user.can_act_for(&a.user_id))
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(address)))
}

/// DELETE /api/address/delete/:id
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    AddressRepository::new(state.db.clone())
        .delete_owned(&id, &user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::message("Address removed")))
}

/// PUT /api/address/:id - 局部更新本人地址
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AddressUpdate>,
) -> AppResult<Json<ApiResponse<Address>>> {
    let address = AddressRepository::new(state.db.clone())
        .update_owned(&id, &user.id, payload)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success_with_message(
        "Address updated",
        address,
    )))
}
