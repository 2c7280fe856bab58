//! Order API 模块
//!
//! 下单扣库存、订单列表、状态修改与月度报表。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/order", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create", post(handler::create))
        .route("/Order-list", get(handler::list))
        .route("/Order-status/{id}", put(handler::update_status))
        .route("/sales", get(handler::sales))
        .route("/users", get(handler::users))
}

#[cfg(test)]
mod tests;
