//! My List API Handlers

use axum::extract::State;

use crate::api::common::normalize_id;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{MyListAddRequest, MyListItem};
use crate::db::repository::MyListRepository;
use crate::utils::extract::{Json, Path};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// POST /api/myList/add - 加入心愿单
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<MyListAddRequest>,
) -> AppResult<Json<ApiResponse<MyListItem>>> {
    if req.product_id.trim().is_empty() {
        return Err(AppError::required("Provide ProductId"));
    }
    let product_id = normalize_id("product", &req.product_id)?;

    let repo = MyListRepository::new(state.db.clone());
    if repo.exists(&user.id, &product_id).await? {
        return Err(AppError::new(ErrorCode::ListItemExists));
    }

    let item = repo
        .create(MyListItem {
            product_id,
            product_title: req.product_title,
            image: req.image,
            rating: req.rating,
            price: req.price,
            old_price: req.old_price,
            brand: req.brand,
            discount: req.discount,
            user_id: user.id.clone(),
            ..Default::default()
        })
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        "The product saved in the my list",
        item,
    )))
}

/// GET /api/myList
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<MyListItem>>>> {
    let items = MyListRepository::new(state.db.clone())
        .find_by_user(&user.id)
        .await?;
    Ok(Json(ApiResponse::success(items)))
}

/// DELETE /api/myList/:id
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    MyListRepository::new(state.db.clone())
        .delete_owned(&id, &user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ListItemNotFound))?;
    Ok(Json(ApiResponse::message(
        "The item removed from My List successfully",
    )))
}
