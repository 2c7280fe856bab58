//! Review API Handlers

use axum::{
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewInput};
use crate::db::repository::ReviewRepository;
use crate::utils::extract::{Json, Query};
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    #[serde(default)]
    pub product_id: Option<String>,
}

impl ReviewQuery {
    fn product(&self) -> Option<&str> {
        self.product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalReviews {
    pub total_reviews: u64,
}

/// POST /api/review/addReview - 发表评论，userId 取自令牌
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(input): Json<ReviewInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let product_id = input.product_id.trim().to_string();
    if product_id.is_empty() {
        return Err(AppError::required("Provide productId"));
    }

    let user_name = match input.user_name.trim() {
        "" => user.name.clone(),
        name => name.to_string(),
    };
    let review = ReviewRepository::new(state.db.clone())
        .create(Review {
            user_name,
            review: input.review,
            image: input.image,
            rating: input.rating,
            user_id: user.id.clone(),
            product_id,
            ..Default::default()
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Review added successfully",
            review,
        )),
    ))
}

/// GET /api/review/getReviews?productId= - 最新在前
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    let reviews = ReviewRepository::new(state.db.clone())
        .find_by_product(query.product())
        .await?;
    Ok(Json(ApiResponse::success(reviews)))
}

/// GET /api/review/getTotalReviews?productId=
pub async fn total(
    State(state): State<ServerState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<ApiResponse<TotalReviews>>> {
    let total_reviews = ReviewRepository::new(state.db.clone())
        .count(query.product())
        .await?;
    Ok(Json(ApiResponse::success(TotalReviews { total_reviews })))
}
