//! JWT Extractor
//!
//! 在受保护的处理器中使用 [`CurrentUser`] / [`AdminUser`] 自动校验令牌并加载用户

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::cookies::{ACCESS_COOKIE, token_from_request};
use crate::auth::{CurrentUser, JwtError};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::AppError;

/// Authenticated principal
///
/// Reads the access token from the `accessToken` cookie or the bearer
/// header, validates it and loads the user so role and status are current.
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let Some(token) = token_from_request(&parts.headers, ACCESS_COOKIE) else {
            security_log!("WARN", "auth_missing", uri = parts.uri.to_string());
            return Err(AppError::with_message(
                shared::error::ErrorCode::NotAuthenticated,
                "Provide token",
            ));
        };

        let claims = match state.get_jwt_service().validate_access_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = e.to_string(),
                    uri = parts.uri.to_string()
                );
                return Err(match e {
                    JwtError::ExpiredToken => AppError::token_expired(),
                    _ => AppError::invalid_token("Invalid token"),
                });
            }
        };

        let user = UserRepository::new(state.db.clone())
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                security_log!("WARN", "auth_unknown_user", user_id = claims.sub.as_str());
                AppError::invalid_token("User not found")
            })?;

        let current = CurrentUser {
            id: user.id_string(),
            name: user.name,
            email: user.email,
            role: user.role,
            status: user.status,
        };
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Authenticated principal with the ADMIN role
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<ServerState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            security_log!(
                "WARN",
                "admin_denied",
                user_id = user.id.as_str(),
                uri = parts.uri.to_string()
            );
            return Err(AppError::with_message(
                shared::error::ErrorCode::AdminRequired,
                "Access denied! Only admins can access this resource",
            ));
        }
        Ok(AdminUser(user))
    }
}

impl std::ops::Deref for AdminUser {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
