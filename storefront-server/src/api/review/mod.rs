//! Review API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/review", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/addReview", post(handler::add))
        .route("/getReviews", get(handler::list))
        .route("/getTotalReviews", get(handler::total))
}
