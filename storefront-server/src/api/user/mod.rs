//! User API 模块
//!
//! 注册、邮箱 OTP 验证、登录、令牌刷新、找回密码、资料维护与管理员用户管理。

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/user", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Public
        .route("/register", post(handler::register))
        .route("/verifyEmail", post(handler::verify_email))
        .route("/login", post(handler::login))
        .route("/authWithGoogle", post(handler::auth_with_google))
        .route("/forgot-password", post(handler::forgot_password))
        .route(
            "/verify-forgot-password-otp",
            post(handler::verify_forgot_password_otp),
        )
        .route("/reset-password", post(handler::reset_password))
        .route("/refresh-Token", post(handler::refresh_token))
        // Authenticated
        .route("/logout", get(handler::logout))
        .route("/user-avatar", put(handler::user_avatar))
        .route("/deleteImage", delete(handler::delete_image))
        .route("/user-details", get(handler::user_details))
        // Admin
        .route("/", get(handler::list))
        .route("/deleteMultiple", post(handler::delete_multiple))
        .route("/status/{id}", put(handler::update_status))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
