//! Category API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/category", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/uploadImagesCreateCategory", post(handler::create))
        .route("/", get(handler::list))
        .route("/get/count", get(handler::count_roots))
        .route("/get/count/subCat", get(handler::count_children))
        .route("/subcategories", get(handler::subcategories))
        .route("/deleteImage", delete(handler::delete_image))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}

#[cfg(test)]
mod tests;
