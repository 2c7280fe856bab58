//! Banner API 模块 (`/api/bannerV1`)

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bannerV1", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/createBanner", post(handler::create))
        .route("/getAllBanners", get(handler::list))
        .route("/getBannersCount", get(handler::count))
        .route("/getBannersByCatId/{id}", get(handler::by_cat_id))
        .route("/getBannersBySubCatId/{id}", get(handler::by_sub_cat_id))
        .route("/deleteMultiple", delete(handler::delete_multiple))
        .route("/updateBanner/{id}", put(handler::update))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}
