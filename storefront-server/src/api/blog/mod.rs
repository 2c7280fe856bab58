//! Blog API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/blog", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/createBlog", post(handler::create))
        .route("/getAllBlogs", get(handler::list))
        .route("/getBlogsCount", get(handler::count))
        .route("/deleteMultiple", delete(handler::delete_multiple))
        .route("/updateBlog/{id}", put(handler::update))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}

#[cfg(test)]
mod tests;
