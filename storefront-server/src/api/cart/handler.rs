//! Cart API Handlers
//!
//! 所有操作都限定在当前用户自己的购物车内

use axum::extract::State;

use crate::api::common::{DeletedCount, normalize_id};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CartAddRequest, CartItem, CartUpdateRequest};
use crate::db::repository::CartRepository;
use crate::utils::extract::{Json, Path};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

fn not_found() -> AppError {
    AppError::new(ErrorCode::CartItemNotFound)
}

/// POST /api/cart/add - 加入购物车
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CartAddRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let product_id = req
        .product_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::required("Provide ProductId"))?;
    let product_id = normalize_id("product", product_id)?;

    let repo = CartRepository::new(state.db.clone());
    if repo
        .find_by_user_and_product(&user.id, &product_id)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::CartItemExists));
    }

    let quantity = req.quantity.unwrap_or(1).max(1);
    let item = repo
        .create(CartItem {
            sub_total: req.sub_total.unwrap_or(req.price * quantity as f64),
            quantity,
            product_id,
            product_title: req.product_title,
            image: req.image,
            rating: req.rating,
            price: req.price,
            old_price: req.old_price,
            discount: req.discount,
            count_in_stock: req.count_in_stock,
            brand: req.brand,
            size: req.size,
            weight: req.weight,
            ram: req.ram,
            user_id: user.id.clone(),
            ..Default::default()
        })
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Item add successfully",
        item,
    )))
}

/// GET /api/cart/get - 当前用户的购物车
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<CartItem>>>> {
    let items = CartRepository::new(state.db.clone())
        .find_by_user(&user.id)
        .await?;
    Ok(Json(ApiResponse::success(items)))
}

/// PUT /api/cart/update-cart-item - 修改数量/规格
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CartUpdateRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    if req.id.trim().is_empty() {
        return Err(AppError::required("Provide _id"));
    }
    if req.qty.is_some_and(|q| q < 1) {
        return Err(AppError::validation("Quantity must be at least 1"));
    }

    let id = req.id.clone();
    let item = CartRepository::new(state.db.clone())
        .update_owned(&id, &user.id, req.into())
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success_with_message("Update cart", item)))
}

/// DELETE /api/cart/delete-cart-item/:id
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    CartRepository::new(state.db.clone())
        .delete_owned(&id, &user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::message("Item remove")))
}

/// DELETE /api/cart/emptyCart/:userId - 清空购物车 (本人或管理员)
pub async fn empty(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let user_id = normalize_id("user", &user_id)?;
    if !user.can_act_for(&user_id) {
        return Err(AppError::new(ErrorCode::NotResourceOwner));
    }

    let removed = CartRepository::new(state.db.clone())
        .clear_user(&user_id)
        .await?;
    tracing::debug!(user_id = %user_id, removed, "Cart emptied");
    Ok(Json(ApiResponse::success_with_message(
        "Cart emptied",
        DeletedCount::new(removed),
    )))
}
