//! Category API Handlers

use std::collections::HashMap;

use axum::extract::State;
use serde::Serialize;

use crate::api::common::{ImageQuery, normalize_id};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryNode, CategoryUpdate, ParentSummary, SubCategoryView};
use crate::db::repository::CategoryRepository;
use crate::utils::extract::{Json, Multipart, Path, Query};
use crate::utils::category_tree::build_tree;
use crate::utils::multipart::FormData;
use crate::utils::upload::{destroy_all, upload_all};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

const TABLE: &str = "category";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryCount {
    pub sub_category_count: usize,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::CategoryNotFound)
}

/// Empty string means "no parent"
fn parent_from_form(form: &FormData) -> AppResult<Option<String>> {
    form.text("parentId")
        .map(|id| normalize_id(TABLE, id))
        .transpose()
}

/// POST /api/category/uploadImagesCreateCategory - 创建分类 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    admin: AdminUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Category>>> {
    let form = FormData::from_multipart(multipart).await?;
    let name = form
        .string("name")
        .ok_or_else(|| AppError::required("Provide category name"))?;

    let images = upload_all(state.media.as_ref(), &form.files("images")).await?;

    let category = CategoryRepository::new(state.db.clone())
        .create(Category {
            name,
            images,
            user_id: admin.id.clone(),
            parent_cat_name: form.string("parentCatName"),
            parent_id: parent_from_form(&form)?,
            ..Default::default()
        })
        .await?;

    tracing::info!(category_id = %category.id_string(), "Category created");
    Ok(Json(ApiResponse::success_with_message(
        "Category created",
        category,
    )))
}

/// GET /api/category - 分类树
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<CategoryNode>>>> {
    let categories = CategoryRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(ApiResponse::success(build_tree(categories))))
}

/// GET /api/category/get/count - 根分类数量
pub async fn count_roots(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<CategoryCount>>> {
    let categories = CategoryRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(ApiResponse::success(CategoryCount {
        category_count: crate::utils::category_tree::count_roots(&categories),
    })))
}

/// GET /api/category/get/count/subCat - 子分类数量
pub async fn count_children(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<SubCategoryCount>>> {
    let categories = CategoryRepository::new(state.db.clone()).find_all().await?;
    let roots = crate::utils::category_tree::count_roots(&categories);
    Ok(Json(ApiResponse::success(SubCategoryCount {
        sub_category_count: categories.len() - roots,
    })))
}

/// GET /api/category/subcategories - 子分类及其父分类信息
pub async fn subcategories(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<SubCategoryView>>>> {
    let categories = CategoryRepository::new(state.db.clone()).find_all().await?;
    let by_id: HashMap<String, &Category> =
        categories.iter().map(|c| (c.id_string(), c)).collect();

    let views = categories
        .iter()
        .filter(|c| !c.is_root())
        .map(|c| {
            let parent = c.parent_id.as_deref().and_then(|pid| by_id.get(pid));
            SubCategoryView {
                category: c.clone(),
                parent_category: parent.map(|p| ParentSummary {
                    id: p.id_string(),
                    name: p.name.clone(),
                }),
                parent_images: parent.map(|p| p.images.clone()).unwrap_or_default(),
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(views)))
}

/// GET /api/category/:id - 单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = CategoryRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(category)))
}

/// DELETE /api/category/deleteImage?img= - 删除 CDN 图片 (管理员)
pub async fn delete_image(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Query(query): Query<ImageQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    crate::api::common::delete_image(&state, query).await
}

/// DELETE /api/category/:id - 删除分类及其两级子分类 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.find_by_id(&id).await?.ok_or_else(not_found)?;
    let category_id = category.id_string();

    let mut doomed: Vec<Category> = Vec::new();
    for child in repo.find_children(&category_id).await? {
        doomed.extend(repo.find_children(&child.id_string()).await?);
        doomed.push(child);
    }

    let doomed_ids: Vec<String> = doomed.iter().map(Category::id_string).collect();
    if !doomed_ids.is_empty() {
        repo.delete_many(&doomed_ids).await?;
    }
    repo.delete(&category_id).await?;

    let images: Vec<String> = doomed
        .iter()
        .chain(std::iter::once(&category))
        .flat_map(|c| c.images.iter().cloned())
        .collect();
    destroy_all(state.media.as_ref(), &images).await;

    tracing::info!(
        category_id = %category_id,
        descendants = doomed_ids.len(),
        "Category deleted"
    );
    Ok(Json(ApiResponse::message("Category deleted!")))
}

/// PUT /api/category/:id - 更新分类 (管理员)
///
/// 未上传新图片时保留原图片
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    repo.find_by_id(&id).await?.ok_or_else(not_found)?;

    let form = FormData::from_multipart(multipart).await?;
    let uploaded = upload_all(state.media.as_ref(), &form.files("images")).await?;

    // An explicitly empty parentId moves the category back to the root
    let (parent_id, parent_cat_name) = match parent_from_form(&form)? {
        Some(parent) if parent == normalize_id(TABLE, &id)? => {
            return Err(AppError::validation("A category cannot be its own parent"));
        }
        Some(parent) => (Some(parent), form.string("parentCatName")),
        None if form.has("parentId") => (Some(String::new()), Some(String::new())),
        None => (None, form.string("parentCatName")),
    };

    let update = CategoryUpdate {
        name: form.string("name"),
        images: (!uploaded.is_empty()).then_some(uploaded),
        parent_cat_name,
        parent_id,
        updated_at: 0,
    };

    let category = repo.update(&id, update).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Category updated successfully",
        category,
    )))
}
