//! My list (wishlist) API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/myList", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/add", post(handler::add))
        .route("/", get(handler::list))
        .route("/{id}", delete(handler::remove))
}
