//! Blog API Handlers

use axum::{
    extract::State,
    http::StatusCode,
};
use serde::Serialize;

use crate::api::common::{DeletedCount, IdsRequest, merge_images};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Blog, BlogUpdate};
use crate::db::repository::BlogRepository;
use crate::utils::extract::{Json, Multipart, Path, Query};
use crate::utils::multipart::FormData;
use crate::utils::pagination::{PageQuery, Paged};
use crate::utils::upload::{destroy_all, upload_all, upload_required};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogsCount {
    pub blogs_count: u64,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::BlogNotFound)
}

/// POST /api/blog/createBlog (管理员)
pub async fn create(
    State(state): State<ServerState>,
    admin: AdminUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Blog>>)> {
    let form = FormData::from_multipart(multipart).await?;
    let images = upload_required(state.media.as_ref(), &form.files("images")).await?;

    let blog = BlogRepository::new(state.db.clone())
        .create(Blog {
            title: form.string("title").unwrap_or_default(),
            description: form.string("description").unwrap_or_default(),
            images,
            user_id: admin.id.clone(),
            ..Default::default()
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Blog created successfully",
            blog,
        )),
    ))
}

/// GET /api/blog/getAllBlogs?page=&perPage=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<Paged<Blog>>>> {
    let page = query.resolve();
    let (items, total) = BlogRepository::new(state.db.clone())
        .find_page(page.per_page, page.offset())
        .await?;
    page.check(total)?;
    Ok(Json(ApiResponse::success(Paged::new(items, total, page))))
}

/// GET /api/blog/getBlogsCount
pub async fn count(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<BlogsCount>>> {
    let blogs_count = BlogRepository::new(state.db.clone()).count().await?;
    Ok(Json(ApiResponse::success(BlogsCount { blogs_count })))
}

/// GET /api/blog/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Blog>>> {
    let blog = BlogRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(blog)))
}

/// PUT /api/blog/updateBlog/:id (管理员)
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Blog>>> {
    let repo = BlogRepository::new(state.db.clone());
    let current = repo.find_by_id(&id).await?.ok_or_else(not_found)?;

    let form = FormData::from_multipart(multipart).await?;
    let uploaded = upload_all(state.media.as_ref(), &form.files("images")).await?;

    let blog = repo
        .update(
            &id,
            BlogUpdate {
                title: form.string("title"),
                description: form.string("description"),
                images: merge_images(&form, &current.images, uploaded),
                updated_at: 0,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        "Blog updated successfully",
        blog,
    )))
}

/// DELETE /api/blog/:id (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let removed = BlogRepository::new(state.db.clone())
        .delete(&id)
        .await?
        .ok_or_else(not_found)?;
    destroy_all(state.media.as_ref(), &removed.images).await;
    Ok(Json(ApiResponse::message("Blog deleted successfully")))
}

/// DELETE /api/blog/deleteMultiple (管理员)
pub async fn delete_multiple(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<IdsRequest>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let ids = payload.require()?;
    let removed = BlogRepository::new(state.db.clone())
        .delete_many(&ids)
        .await?;
    let images: Vec<String> = removed.iter().flat_map(|b| b.images.clone()).collect();
    destroy_all(state.media.as_ref(), &images).await;
    Ok(Json(ApiResponse::success_with_message(
        "Blogs deleted successfully",
        DeletedCount::new(removed.len()),
    )))
}
