//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/add", post(handler::add))
        .route("/get", get(handler::list))
        .route("/update-cart-item", put(handler::update))
        .route("/delete-cart-item/{id}", delete(handler::remove))
        .route("/emptyCart/{id}", delete(handler::empty))
}

#[cfg(test)]
mod tests;
