//! Product API Handlers

use std::cmp::Ordering;
use std::str::FromStr;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::common::{DeletedCount, IdsRequest, ImageQuery, validate_payload};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::serde_helpers;
use crate::db::models::{Product, ProductFilter, ProductSort, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::extract::{Json, Multipart, Path, Query};
use crate::utils::multipart::FormData;
use crate::utils::pagination::{Page, PageQuery, Paged};
use crate::utils::upload::{destroy_all, upload_all};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

type PageResponse = AppResult<Json<ApiResponse<Paged<Product>>>>;
type ListResponse = AppResult<Json<ApiResponse<Vec<Product>>>>;

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuery {
    #[serde(default)]
    pub cat_id: Option<String>,
    #[serde(default)]
    pub sub_cat_id: Option<String>,
    #[serde(default, rename = "thirdsubCatId")]
    pub third_sub_cat_id: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingQuery {
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub cat_id: Option<String>,
    #[serde(default)]
    pub sub_cat_id: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

/// POST /filterProducts body
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub cat_id: Vec<String>,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub sub_cat_id: Vec<String>,
    #[serde(rename = "thirdsubCatId", deserialize_with = "serde_helpers::vec_or_empty")]
    pub third_sub_cat_id: Vec<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub rating: Vec<f64>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// POST /sortBy body
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SortRequest {
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub products: Vec<Value>,
    pub sort_by: String,
    pub order: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsCount {
    pub products_count: u64,
}

/// Keys accepted by `/sortBy`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Rating,
    CreatedAt,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "rating" => Ok(SortKey::Rating),
            "createdAt" => Ok(SortKey::CreatedAt),
            other => Err(AppError::with_message(
                ErrorCode::InvalidSortKey,
                format!("Unsupported sort key: {}", other),
            )),
        }
    }
}

impl SortKey {
    fn field(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Rating => "rating",
            SortKey::CreatedAt => "createdAt",
        }
    }

    /// Missing values sort as empty / zero
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let (a, b) = (&a[self.field()], &b[self.field()]);
        match self {
            SortKey::Name => text_key(a).cmp(&text_key(b)),
            _ => numeric_key(a)
                .partial_cmp(&numeric_key(b))
                .unwrap_or(Ordering::Equal),
        }
    }
}

fn text_key(v: &Value) -> String {
    v.as_str().unwrap_or_default().to_lowercase()
}

/// Numbers, numeric strings and RFC 3339 timestamps
fn numeric_key(v: &Value) -> f64 {
    if let Some(n) = v.as_f64() {
        return n;
    }
    let Some(s) = v.as_str() else {
        return 0.0;
    };
    s.trim()
        .parse::<f64>()
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.timestamp_millis() as f64)
        })
        .unwrap_or(0.0)
}

/// Stable sort of client-supplied product documents
pub fn sort_products(products: &mut [Value], key: SortKey, descending: bool) {
    products.sort_by(|a, b| {
        let ord = key.compare(a, b);
        if descending { ord.reverse() } else { ord }
    });
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::ProductNotFound)
}

/// Lenient number from a query string, garbage is ignored
fn query_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Scalar and variant fields of the product form; images are handled separately
fn fields_from_form(form: &FormData) -> AppResult<ProductUpdate> {
    let list = |name: &str| form.has(name).then(|| form.list(name));
    Ok(ProductUpdate {
        name: form.string("name"),
        description: form.string("description"),
        brand: form.string("brand"),
        price: form.f64("price")?,
        old_price: form.f64("oldPrice")?,
        cat_name: form.string("catName"),
        cat_id: form.string("catId").or_else(|| form.string("CatId")),
        sub_cat_id: form.string("subCatId"),
        sub_cat: form.string("subCat"),
        third_sub_cat: form.string("thirdsubCat"),
        third_sub_cat_id: form.string("thirdsubCatId"),
        category: form.string("category"),
        count_in_stock: form.i64("countInStock")?,
        rating: form.f64("rating")?,
        is_featured: form.bool("isFeatured"),
        discount: form.f64("discount")?,
        sale: form.i64("sale")?,
        product_ram: list("productRam"),
        size: list("size"),
        product_weight: list("productWeight"),
        banner_title_name: form.string("bannerTitleName"),
        is_display_on_home_banner: form.bool("isDisplayOnHomeBanner"),
        images: None,
        banner_images: None,
        updated_at: None,
    })
}

async fn page_of(
    state: &ServerState,
    filter: ProductFilter,
    sort: ProductSort,
    page: Page,
) -> PageResponse {
    let (items, total) = ProductRepository::new(state.db.clone())
        .find_page(&filter, sort, page.per_page, page.offset())
        .await?;
    page.check(total)?;
    Ok(Json(ApiResponse::success(Paged::new(items, total, page))))
}

/// POST /api/product/createProduct - 创建商品，带 productId 时为合并更新 (管理员)
///
/// 合并更新只写入提交的字段，新上传图片追加到原有图片之后
pub async fn create(
    State(state): State<ServerState>,
    admin: AdminUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let form = FormData::from_multipart(multipart).await?;
    let mut fields = fields_from_form(&form)?;
    validate_payload(&fields)?;

    let repo = ProductRepository::new(state.db.clone());
    let existing = match form.text("productId") {
        Some(id) => Some(repo.find_by_id(id).await?.ok_or_else(not_found)?),
        None => None,
    };
    if existing.is_none() && fields.name.is_none() {
        return Err(AppError::required("Provide product name"));
    }

    let images = upload_all(state.media.as_ref(), &form.files("images")).await?;
    let banner_images = upload_all(state.media.as_ref(), &form.files("bannerImages")).await?;

    match existing {
        Some(current) => {
            if !images.is_empty() {
                fields.images = Some(current.images.iter().cloned().chain(images).collect());
            }
            if !banner_images.is_empty() {
                fields.banner_images = Some(
                    current
                        .banner_images
                        .iter()
                        .cloned()
                        .chain(banner_images)
                        .collect(),
                );
            }
            let product = repo.update(&current.id_string(), fields).await?;
            tracing::info!(product_id = %product.id_string(), "Product merged");
            Ok(Json(ApiResponse::success_with_message(
                "Product updated successfully",
                product,
            )))
        }
        None => {
            let mut product = Product {
                images,
                banner_images,
                user_id: admin.id.clone(),
                ..Default::default()
            };
            fields.apply_to(&mut product);
            let product = repo.create(product).await?;
            tracing::info!(product_id = %product.id_string(), "Product created");
            Ok(Json(ApiResponse::success_with_message(
                "Product created successfully",
                product,
            )))
        }
    }
}

/// GET /api/product/getAllProducts - 分页商品列表
pub async fn list(State(state): State<ServerState>, Query(query): Query<PageQuery>) -> PageResponse {
    page_of(&state, ProductFilter::default(), ProductSort::Newest, query.resolve()).await
}

/// GET /api/product/getAllProductsByCatId/:id
pub async fn by_cat_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> PageResponse {
    let filter = ProductFilter {
        cat_ids: vec![id],
        ..Default::default()
    };
    page_of(&state, filter, ProductSort::Newest, query.resolve()).await
}

/// GET /api/product/getAllProductsBySubCatId/:id
pub async fn by_sub_cat_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> PageResponse {
    let filter = ProductFilter {
        sub_cat_ids: vec![id],
        ..Default::default()
    };
    page_of(&state, filter, ProductSort::Newest, query.resolve()).await
}

/// GET /api/product/getAllProductsByThirdLavelCat/:id
pub async fn by_third_cat_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> PageResponse {
    let filter = ProductFilter {
        third_sub_cat_ids: vec![id],
        ..Default::default()
    };
    page_of(&state, filter, ProductSort::Newest, query.resolve()).await
}

fn required_name(query: &NameQuery) -> AppResult<String> {
    non_empty(query.name.clone()).ok_or_else(|| AppError::required("Provide name"))
}

/// GET /api/product/getAllProductsByCatName?name=
pub async fn by_cat_name(State(state): State<ServerState>, Query(query): Query<NameQuery>) -> PageResponse {
    let filter = ProductFilter {
        cat_name: Some(required_name(&query)?),
        ..Default::default()
    };
    page_of(&state, filter, ProductSort::Newest, query.page.resolve()).await
}

/// GET /api/product/getAllProductsBySubCatName?name=
pub async fn by_sub_cat_name(
    State(state): State<ServerState>,
    Query(query): Query<NameQuery>,
) -> PageResponse {
    let filter = ProductFilter {
        sub_cat_name: Some(required_name(&query)?),
        ..Default::default()
    };
    page_of(&state, filter, ProductSort::Newest, query.page.resolve()).await
}

/// GET /api/product/getAllProductsByThirdLavelCatName?name=
pub async fn by_third_cat_name(
    State(state): State<ServerState>,
    Query(query): Query<NameQuery>,
) -> PageResponse {
    let filter = ProductFilter {
        third_sub_cat_name: Some(required_name(&query)?),
        ..Default::default()
    };
    page_of(&state, filter, ProductSort::Newest, query.page.resolve()).await
}

/// GET /api/product/getAllProductsByPrice - 单一分类范围内按价格区间过滤
///
/// 同时给出多个分类时取最细的一级
pub async fn by_price(State(state): State<ServerState>, Query(query): Query<PriceQuery>) -> ListResponse {
    let mut filter = ProductFilter {
        min_price: query_number(query.min_price.as_deref()),
        max_price: query_number(query.max_price.as_deref()),
        ..Default::default()
    };
    if let Some(id) = non_empty(query.third_sub_cat_id) {
        filter.third_sub_cat_ids = vec![id];
    } else if let Some(id) = non_empty(query.sub_cat_id) {
        filter.sub_cat_ids = vec![id];
    } else if let Some(id) = non_empty(query.cat_id) {
        filter.cat_ids = vec![id];
    }

    let products = ProductRepository::new(state.db.clone())
        .find_all(&filter, ProductSort::Newest)
        .await?;
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/product/getAllProductsByRating - 按评分过滤，评分降序
pub async fn by_rating(State(state): State<ServerState>, Query(query): Query<RatingQuery>) -> PageResponse {
    let rating = query_number(query.rating.as_deref());
    let cat_id = non_empty(query.cat_id);
    if rating.is_none() && cat_id.is_none() {
        return Err(AppError::required("Provide rating or catId"));
    }

    let filter = ProductFilter {
        rating,
        cat_ids: cat_id.into_iter().collect(),
        sub_cat_ids: non_empty(query.sub_cat_id).into_iter().collect(),
        ..Default::default()
    };
    page_of(&state, filter, ProductSort::RatingDesc, query.page.resolve()).await
}

/// GET /api/product/getAllProductsCount
pub async fn count(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<ProductsCount>>> {
    let products_count = ProductRepository::new(state.db.clone())
        .count(&ProductFilter::default())
        .await?;
    Ok(Json(ApiResponse::success(ProductsCount { products_count })))
}

/// GET /api/product/getAllFeaturedProducts
pub async fn featured(State(state): State<ServerState>) -> ListResponse {
    let filter = ProductFilter {
        featured: Some(true),
        ..Default::default()
    };
    let products = ProductRepository::new(state.db.clone())
        .find_all(&filter, ProductSort::Newest)
        .await?;
    Ok(Json(ApiResponse::success(products)))
}

/// POST /api/product/filterProducts - 分类并集 + 价格区间 + 最低评分
pub async fn filter(State(state): State<ServerState>, Json(req): Json<FilterRequest>) -> PageResponse {
    let filter = ProductFilter {
        cat_ids: req.cat_id,
        sub_cat_ids: req.sub_cat_id,
        third_sub_cat_ids: req.third_sub_cat_id,
        min_price: req.min_price,
        max_price: req.max_price,
        min_rating: req.rating.iter().copied().reduce(f64::min),
        ..Default::default()
    };
    page_of(&state, filter, ProductSort::Newest, Page::new(req.page, req.limit)).await
}

/// POST /api/product/sortBy - 对提交的商品列表排序
pub async fn sort_by(Json(req): Json<SortRequest>) -> AppResult<Json<ApiResponse<Vec<Value>>>> {
    let key: SortKey = req.sort_by.parse()?;
    let descending = req.order.trim().eq_ignore_ascii_case("desc");

    let mut products = req.products;
    sort_products(&mut products, key, descending);
    Ok(Json(ApiResponse::success(products)))
}

/// GET /api/product/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = ProductRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(product)))
}

/// PUT /api/product/updateProduct/:id - JSON 更新 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    validate_payload(&payload)?;
    let repo = ProductRepository::new(state.db.clone());
    repo.find_by_id(&id).await?.ok_or_else(not_found)?;

    let product = repo.update(&id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Product updated successfully",
        product,
    )))
}

/// DELETE /api/product/:id - 删除商品及其图片 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let removed = ProductRepository::new(state.db.clone())
        .delete(&id)
        .await?
        .ok_or_else(not_found)?;
    destroy_all(state.media.as_ref(), removed.all_images()).await;

    tracing::info!(product_id = %removed.id_string(), "Product deleted");
    Ok(Json(ApiResponse::message("Product Deleted!")))
}

/// DELETE /api/product/deleteMultiple - 批量删除商品 (管理员)
pub async fn delete_multiple(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<IdsRequest>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let ids = payload.require()?;
    let removed = ProductRepository::new(state.db.clone())
        .delete_many(&ids)
        .await?;
    let images: Vec<String> = removed
        .iter()
        .flat_map(Product::all_images)
        .cloned()
        .collect();
    destroy_all(state.media.as_ref(), &images).await;

    tracing::info!(count = removed.len(), "Products deleted");
    Ok(Json(ApiResponse::success_with_message(
        "Products deleted successfully",
        DeletedCount::new(removed.len()),
    )))
}

/// DELETE /api/product/deleteImage?img= (管理员)
pub async fn delete_image(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Query(query): Query<ImageQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    crate::api::common::delete_image(&state, query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("createdAt".parse::<SortKey>().unwrap(), SortKey::CreatedAt);
        let err = "colour".parse::<SortKey>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSortKey);
    }

    #[test]
    fn test_sort_products() {
        let mut items = vec![
            json!({"name": "banana", "price": 3, "createdAt": "2024-02-01T00:00:00Z"}),
            json!({"name": "Apple", "price": "10", "createdAt": "2024-01-01T00:00:00Z"}),
            json!({"name": "cherry"}),
        ];
        sort_products(&mut items, SortKey::Name, false);
        assert_eq!(items[0]["name"], "Apple");

        sort_products(&mut items, SortKey::Price, true);
        assert_eq!(items[0]["name"], "Apple");
        assert_eq!(items[2]["name"], "cherry");

        sort_products(&mut items, SortKey::CreatedAt, true);
        assert_eq!(items[0]["name"], "banana");
    }
}
