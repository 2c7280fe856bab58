//! Product API 模块
//!
//! 商品 CRUD、按分类 / 价格 / 评分的列表查询、筛选排序，以及 RAM / 重量 / 尺寸规格表。

mod handler;
mod variant;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;
use variant::{Ram, Size, VariantRoute, Weight};

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/product", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/createProduct", post(handler::create))
        // Listings
        .route("/getAllProducts", get(handler::list))
        .route("/getAllProductsByCatId/{id}", get(handler::by_cat_id))
        .route("/getAllProductsBySubCatId/{id}", get(handler::by_sub_cat_id))
        .route(
            "/getAllProductsByThirdLavelCat/{id}",
            get(handler::by_third_cat_id),
        )
        .route("/getAllProductsByCatName", get(handler::by_cat_name))
        .route("/getAllProductsBySubCatName", get(handler::by_sub_cat_name))
        .route(
            "/getAllProductsByThirdLavelCatName",
            get(handler::by_third_cat_name),
        )
        .route("/getAllProductsByPrice", get(handler::by_price))
        .route("/getAllProductsByRating", get(handler::by_rating))
        .route("/getAllProductsCount", get(handler::count))
        .route("/getAllFeaturedProducts", get(handler::featured))
        .route("/filterProducts", post(handler::filter))
        .route("/sortBy", post(handler::sort_by))
        // Admin
        .route("/deleteMultiple", delete(handler::delete_multiple))
        .route("/deleteImage", delete(handler::delete_image))
        .route("/updateProduct/{id}", put(handler::update))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        // Variant lookups
        .merge(variant_routes::<Ram>("RAMS"))
        .merge(variant_routes::<Weight>("Weight"))
        .merge(variant_routes::<Size>("Size"))
}

/// `/productX/create`, `/ProductX/get`, `/ProductX/{id}`, `/updateProductX/{id}`,
/// `/productX/{id}` and `/deleteMultipleProductX`
fn variant_routes<K: VariantRoute>(name: &str) -> Router<ServerState> {
    Router::new()
        .route(
            &format!("/product{}/create", name),
            post(variant::create::<K>),
        )
        .route(&format!("/Product{}/get", name), get(variant::list::<K>))
        .route(
            &format!("/Product{}/{{id}}", name),
            get(variant::get_by_id::<K>),
        )
        .route(
            &format!("/updateProduct{}/{{id}}", name),
            put(variant::update::<K>),
        )
        .route(
            &format!("/product{}/{{id}}", name),
            delete(variant::delete::<K>),
        )
        .route(
            &format!("/deleteMultipleProduct{}", name),
            delete(variant::delete_multiple::<K>),
        )
}

#[cfg(test)]
mod tests;
