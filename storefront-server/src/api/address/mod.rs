//! Address API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/address", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/addAddress", post(handler::add))
        .route("/add", post(handler::add))
        .route("/get", get(handler::list))
        .route("/get/{id}", get(handler::get_by_id))
        .route("/delete/{id}", delete(handler::remove))
        .route("/{id}", put(handler::update))
}
