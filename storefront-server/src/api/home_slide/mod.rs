//! Home slides API 模块 (`/api/homeSlides`)

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/homeSlides", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/uploadImages", post(handler::upload_images))
        .route("/add", post(handler::add))
        .route("/", get(handler::list))
        .route("/deleteImages", delete(handler::delete_image))
        .route("/deleteMultiple", post(handler::delete_multiple))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
