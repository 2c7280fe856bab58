//! User API Handlers

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use crate::api::common::{DeletedCount, IdsRequest, ImageQuery, normalize_id, validate_payload};
use crate::auth::cookies::{
    ACCESS_COOKIE, REFRESH_COOKIE, append_set_cookie, build_cookie, clear_cookie,
    token_from_request,
};
use crate::auth::password::{generate_otp, hash_secret, normalize_email, verify_secret};
use crate::auth::rate_limit::{LOGIN, OTP, REGISTER};
use crate::auth::{AdminUser, ClientIp, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{
    EmailRequest, GoogleAuthRequest, LoginRequest, OtpPurpose, RegisterRequest,
    ResetPasswordRequest, StatusRequest, User, UserProfile, UserStatus, UserUpdate,
    UserUpdateRequest, VerifyOtpRequest,
};
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::services::mailer::{EmailMessage, password_reset_email, verification_email};
use crate::utils::extract::{Json, Multipart, Path, Query};
use crate::utils::multipart::FormData;
use crate::utils::upload::{destroy_all, destroy_by_url, upload_all};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::util::now_millis;

const TABLE: &str = "user";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub avatar: String,
}

fn hash(secret: &str) -> AppResult<String> {
    hash_secret(secret).map_err(|e| AppError::internal(format!("Hashing failed: {}", e)))
}

fn email_not_available() -> AppError {
    AppError::with_message(ErrorCode::InvalidRequest, "Email not available")
}

/// Issue a new OTP for `user`, store its hash and mail the code
///
/// Delivery failures are logged; the caller still answers success.
async fn issue_otp(
    state: &ServerState,
    user: &User,
    purpose: OtpPurpose,
    template: fn(&str, &str, &str) -> EmailMessage,
) -> AppResult<()> {
    let otp = generate_otp();
    let expires = now_millis() + state.config.otp_ttl_minutes * 60 * 1000;
    UserRepository::new(state.db.clone())
        .set_otp(&user.id_string(), hash(&otp)?, expires, purpose)
        .await?;

    if let Err(e) = state.mailer.send(template(&user.email, &user.name, &otp)).await {
        tracing::warn!(email = %user.email, error = %e, "Failed to send OTP email");
    }
    Ok(())
}

/// Check a submitted OTP against the stored hash
///
/// A wrong code counts one attempt. Reaching the limit burns the code.
async fn check_otp(
    state: &ServerState,
    user: &User,
    submitted: &str,
    purpose: OtpPurpose,
) -> AppResult<()> {
    let repo = UserRepository::new(state.db.clone());
    let id = user.id_string();

    let (Some(stored), Some(expires)) = (&user.otp, user.otp_expires) else {
        return Err(AppError::with_message(
            ErrorCode::VerificationCodeInvalid,
            "Invalid OTP",
        ));
    };
    if user.otp_purpose != Some(purpose) {
        return Err(AppError::with_message(
            ErrorCode::VerificationCodeInvalid,
            "Invalid OTP",
        ));
    }
    if expires < now_millis() {
        return Err(AppError::with_message(
            ErrorCode::VerificationCodeExpired,
            "OTP has expired",
        ));
    }
    if user.otp_attempts >= state.config.otp_max_attempts {
        repo.clear_otp(&id).await?;
        return Err(AppError::new(ErrorCode::TooManyAttempts));
    }

    let matches = verify_secret(submitted.trim(), stored)
        .map_err(|e| AppError::internal(format!("OTP check failed: {}", e)))?;
    if !matches {
        let attempts = repo.increment_otp_attempts(&id).await?;
        security_log!("WARN", "otp_mismatch", user_id = id.as_str(), attempts = attempts);
        if attempts >= state.config.otp_max_attempts {
            repo.clear_otp(&id).await?;
            return Err(AppError::new(ErrorCode::TooManyAttempts));
        }
        return Err(AppError::with_message(
            ErrorCode::VerificationCodeInvalid,
            "Invalid OTP",
        ));
    }
    Ok(())
}

/// Generate both tokens, persist the refresh id and build the cookies
async fn start_session(state: &ServerState, user: &User) -> AppResult<(HeaderMap, TokenPair)> {
    let jwt = state.get_jwt_service();
    let user_id = user.id_string();
    let jti = uuid::Uuid::new_v4().to_string();

    let access_token = jwt.generate_access_token(&user_id, &user.email, user.role)?;
    let refresh_token = jwt.generate_refresh_token(&user_id, &user.email, user.role, &jti)?;

    UserRepository::new(state.db.clone())
        .record_login(&user_id, &jti)
        .await?;

    let secure = state.config.cookie_secure;
    let mut headers = HeaderMap::new();
    append_set_cookie(
        &mut headers,
        build_cookie(ACCESS_COOKIE, &access_token, jwt.access_max_age_secs(), secure),
    );
    append_set_cookie(
        &mut headers,
        build_cookie(REFRESH_COOKIE, &refresh_token, jwt.refresh_max_age_secs(), secure),
    );

    security_log!("INFO", "login", user_id = user_id.as_str());
    Ok((
        headers,
        TokenPair {
            access_token,
            refresh_token,
        },
    ))
}

fn ensure_active(user: &User) -> AppResult<()> {
    if user.status != UserStatus::Active {
        return Err(AppError::with_message(
            ErrorCode::InvalidAccountStatus,
            "Contact to Admin",
        ));
    }
    Ok(())
}

/// POST /api/user/register - 注册并发送验证码
pub async fn register(
    State(state): State<ServerState>,
    ip: ClientIp,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
    state.rate_limiter.enforce(REGISTER, &ip)?;

    if payload.name.trim().is_empty() || payload.email.trim().is_empty() || payload.password.is_empty()
    {
        return Err(AppError::required("Provide email, name, password"));
    }
    payload.email = normalize_email(&payload.email);
    payload.name = payload.name.trim().to_string();
    validate_payload(&payload)?;

    let repo = UserRepository::new(state.db.clone());
    if repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::EmailAlreadyRegistered,
            "A user with this email has already been registered.",
        ));
    }

    let user = repo
        .create(User::new(payload.name, payload.email, hash(&payload.password)?))
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::Duplicate(_) => AppError::with_message(
                ErrorCode::EmailAlreadyRegistered,
                "A user with this email has already been registered.",
            ),
            other => other.into(),
        })?;

    issue_otp(&state, &user, OtpPurpose::VerifyEmail, verification_email).await?;
    tracing::info!(user_id = %user.id_string(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "User registered successfully! Please verify your email.",
            user.profile(),
        )),
    ))
}

/// POST /api/user/verifyEmail - 校验注册验证码
pub async fn verify_email(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    if payload.email.trim().is_empty() || payload.otp.trim().is_empty() {
        return Err(AppError::required("Provide email and otp"));
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if user.verify_email {
        return Err(AppError::with_message(
            ErrorCode::EmailAlreadyVerified,
            "Email is already verified",
        ));
    }

    check_otp(&state, &user, &payload.otp, OtpPurpose::VerifyEmail).await?;
    repo.mark_email_verified(&user.id_string()).await?;

    Ok(Json(ApiResponse::message("Email verified successfully")))
}

/// POST /api/user/login - 登录并下发 Cookie
pub async fn login(
    State(state): State<ServerState>,
    ip: ClientIp,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(HeaderMap, Json<ApiResponse<TokenPair>>)> {
    state.rate_limiter.enforce(LOGIN, &ip)?;

    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::required("Provide email and password"));
    }

    let email = normalize_email(&payload.email);
    let Some(user) = UserRepository::new(state.db.clone())
        .find_by_email(&email)
        .await?
    else {
        security_log!("WARN", "login_unknown_email", email = email.as_str(), ip = ip.0.as_str());
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "User not register",
        ));
    };

    ensure_active(&user)?;

    if !user.verify_email {
        return Err(AppError::with_message(
            ErrorCode::EmailNotVerified,
            "Your Email is not verify yet please verify your email first",
        ));
    }

    let password_ok = !user.password.is_empty()
        && verify_secret(&payload.password, &user.password)
            .map_err(|e| AppError::internal(format!("Password check failed: {}", e)))?;
    if !password_ok {
        security_log!("WARN", "login_bad_password", email = email.as_str(), ip = ip.0.as_str());
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Check your password",
        ));
    }

    let (headers, tokens) = start_session(&state, &user).await?;
    Ok((
        headers,
        Json(ApiResponse::success_with_message("Login successfully", tokens)),
    ))
}

/// POST /api/user/authWithGoogle - Google 登录 (必要时创建账户)
pub async fn auth_with_google(
    State(state): State<ServerState>,
    ip: ClientIp,
    Json(payload): Json<GoogleAuthRequest>,
) -> AppResult<(HeaderMap, Json<ApiResponse<TokenPair>>)> {
    state.rate_limiter.enforce(REGISTER, &ip)?;

    let verifier = state.identity.clone().ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ServiceUnavailable,
            "Google sign-in is not configured",
        )
    })?;

    if payload.id_token.trim().is_empty() {
        return Err(AppError::required("Provide idToken"));
    }

    let identity = verifier.verify(payload.id_token.trim()).await.map_err(|e| {
        security_log!("WARN", "google_token_rejected", error = e.to_string(), ip = ip.0.as_str());
        AppError::with_message(ErrorCode::IdentityTokenInvalid, e.to_string())
    })?;

    let repo = UserRepository::new(state.db.clone());
    let email = normalize_email(&identity.email);
    let user = match repo.find_by_email(&email).await? {
        Some(existing) => {
            ensure_active(&existing)?;
            if !existing.verify_email {
                repo.mark_email_verified(&existing.id_string()).await?;
            }
            existing
        }
        None => {
            let mut user = User::new(identity.name, email, String::new());
            user.verify_email = true;
            user.sign_up_with_google = true;
            user.avatar = identity.picture.unwrap_or_default();
            let user = repo.create(user).await?;
            tracing::info!(user_id = %user.id_string(), "User registered with Google");
            user
        }
    };

    let (headers, tokens) = start_session(&state, &user).await?;
    Ok((
        headers,
        Json(ApiResponse::success_with_message("Login successfully", tokens)),
    ))
}

/// GET /api/user/logout - 清除 Cookie 并吊销刷新令牌
pub async fn logout(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<(HeaderMap, Json<ApiResponse<()>>)> {
    UserRepository::new(state.db.clone())
        .set_refresh_token_id(&current_user.id, None)
        .await?;

    let secure = state.config.cookie_secure;
    let mut headers = HeaderMap::new();
    append_set_cookie(&mut headers, clear_cookie(ACCESS_COOKIE, secure));
    append_set_cookie(&mut headers, clear_cookie(REFRESH_COOKIE, secure));

    security_log!("INFO", "logout", user_id = current_user.id.as_str());
    Ok((headers, Json(ApiResponse::message("Logout successfully"))))
}

/// PUT /api/user/user-avatar - 上传头像 (替换旧头像)
pub async fn user_avatar(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<AvatarResponse>>> {
    let form = FormData::from_multipart(multipart).await?;
    let files = form.files("avatar");
    let Some(first) = files.first() else {
        return Err(AppError::new(ErrorCode::ImageRequired));
    };

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let urls = upload_all(state.media.as_ref(), std::slice::from_ref(first)).await?;
    let avatar = urls.into_iter().next().unwrap_or_default();

    if !user.avatar.is_empty() {
        destroy_by_url(state.media.as_ref(), &user.avatar).await;
    }
    repo.set_avatar(&current_user.id, avatar.clone()).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Avatar updated",
        AvatarResponse {
            id: current_user.id,
            avatar,
        },
    )))
}

/// DELETE /api/user/deleteImage?img= - 删除 CDN 图片
pub async fn delete_image(
    State(state): State<ServerState>,
    _current_user: CurrentUser,
    Query(query): Query<ImageQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    crate::api::common::delete_image(&state, query).await
}

/// PUT /api/user/:id - 更新资料 (本人或管理员)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdateRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let id = normalize_id(TABLE, &id)?;
    if !current_user.can_act_for(&id) {
        return Err(AppError::forbidden("You can only update your own profile"));
    }
    validate_payload(&payload)?;

    let repo = UserRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let new_email = payload
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty() && *e != existing.email);

    let update = UserUpdate {
        name: payload.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        verify_email: new_email.as_ref().map(|_| false),
        email: new_email.clone(),
        mobile: payload.mobile,
        password: match payload.password.as_deref() {
            Some(p) if !p.is_empty() => Some(hash(p)?),
            _ => None,
        },
        updated_at: 0,
    };

    let updated = repo.update_profile(&id, update).await?;
    if new_email.is_some() {
        issue_otp(&state, &updated, OtpPurpose::VerifyEmail, verification_email).await?;
    }

    Ok(Json(ApiResponse::success_with_message(
        "User Updated successfully",
        updated.profile(),
    )))
}

/// POST /api/user/forgot-password - 发送重置密码验证码
pub async fn forgot_password(
    State(state): State<ServerState>,
    ip: ClientIp,
    Json(payload): Json<EmailRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.rate_limiter.enforce(OTP, &ip)?;

    if payload.email.trim().is_empty() {
        return Err(AppError::required("Provide email"));
    }
    let user = UserRepository::new(state.db.clone())
        .find_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or_else(email_not_available)?;

    issue_otp(&state, &user, OtpPurpose::ResetPassword, password_reset_email).await?;
    Ok(Json(ApiResponse::message("check your email")))
}

/// POST /api/user/verify-forgot-password-otp - 校验重置密码验证码
pub async fn verify_forgot_password_otp(
    State(state): State<ServerState>,
    ip: ClientIp,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.rate_limiter.enforce(OTP, &ip)?;

    if payload.email.trim().is_empty() || payload.otp.trim().is_empty() {
        return Err(AppError::required("Provide required field email, otp."));
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or_else(email_not_available)?;

    check_otp(&state, &user, &payload.otp, OtpPurpose::ResetPassword).await?;
    repo.mark_reset_verified(&user.id_string()).await?;

    Ok(Json(ApiResponse::message("Verify otp successfully")))
}

/// POST /api/user/reset-password - 设置新密码
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    if payload.email.trim().is_empty()
        || payload.new_password.is_empty()
        || payload.confirm_password.is_empty()
    {
        return Err(AppError::required(
            "provide required fields email, newPassword, confirmPassword",
        ));
    }
    if payload.new_password != payload.confirm_password {
        return Err(AppError::with_message(
            ErrorCode::PasswordMismatch,
            "newPassword and confirmPassword must be same.",
        ));
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or_else(email_not_available)?;

    if !user.password_reset_verified {
        return Err(AppError::new(ErrorCode::PasswordResetNotVerified));
    }

    repo.reset_password(&user.id_string(), hash(&payload.new_password)?)
        .await?;
    security_log!("INFO", "password_reset", user_id = user.id_string().as_str());

    Ok(Json(ApiResponse::message("Password updated successfully.")))
}

/// POST /api/user/refresh-Token - 用刷新令牌换取新的访问令牌
pub async fn refresh_token(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> AppResult<(HeaderMap, Json<ApiResponse<AccessToken>>)> {
    let token = token_from_request(&headers, REFRESH_COOKIE)
        .ok_or_else(|| AppError::invalid_token("Invalid token"))?;

    let jwt = state.get_jwt_service();
    let claims = jwt.validate_refresh_token(&token).map_err(|e| {
        security_log!("WARN", "refresh_failed", error = e.to_string());
        AppError::from(e)
    })?;

    let user = UserRepository::new(state.db.clone())
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::invalid_token("Invalid token"))?;

    if user.refresh_token_id.as_deref() != Some(claims.jti.as_str()) {
        security_log!("WARN", "refresh_revoked", user_id = claims.sub.as_str());
        return Err(AppError::new(ErrorCode::TokenRevoked));
    }
    ensure_active(&user)?;

    let access_token = jwt.generate_access_token(&user.id_string(), &user.email, user.role)?;

    let mut out = HeaderMap::new();
    append_set_cookie(
        &mut out,
        build_cookie(
            ACCESS_COOKIE,
            &access_token,
            jwt.access_max_age_secs(),
            state.config.cookie_secure,
        ),
    );

    Ok((
        out,
        Json(ApiResponse::success_with_message(
            "New Access token generated",
            AccessToken { access_token },
        )),
    ))
}

/// GET /api/user/user-details - 当前用户资料
pub async fn user_details(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let user = UserRepository::new(state.db.clone())
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(ApiResponse::success_with_message(
        "user details",
        user.profile(),
    )))
}

/// GET /api/user - 所有用户 (管理员)
pub async fn list(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    let users = UserRepository::new(state.db.clone()).find_all().await?;
    Ok(Json(ApiResponse::success(
        users.iter().map(User::profile).collect(),
    )))
}

/// GET /api/user/:id - 单个用户 (管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let user = UserRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(ApiResponse::success(user.profile())))
}

/// DELETE /api/user/:id - 删除用户及其头像 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let removed = UserRepository::new(state.db.clone())
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if !removed.avatar.is_empty() {
        destroy_by_url(state.media.as_ref(), &removed.avatar).await;
    }
    security_log!(
        "INFO",
        "user_deleted",
        user_id = removed.id_string().as_str(),
        by = admin.id.as_str()
    );
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

/// POST /api/user/deleteMultiple - 批量删除用户 (管理员)
pub async fn delete_multiple(
    State(state): State<ServerState>,
    admin: AdminUser,
    Json(payload): Json<IdsRequest>,
) -> AppResult<Json<ApiResponse<DeletedCount>>> {
    let ids = payload.require()?;
    let removed = UserRepository::new(state.db.clone())
        .delete_many(&ids)
        .await?;

    let avatars: Vec<String> = removed
        .iter()
        .map(|u| u.avatar.clone())
        .filter(|a| !a.is_empty())
        .collect();
    destroy_all(state.media.as_ref(), &avatars).await;

    security_log!(
        "INFO",
        "users_deleted",
        count = removed.len(),
        by = admin.id.as_str()
    );
    Ok(Json(ApiResponse::success_with_message(
        "Users deleted successfully",
        DeletedCount::new(removed.len()),
    )))
}

/// PUT /api/user/status/:id - 修改账户状态 (管理员)
pub async fn update_status(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let status: UserStatus = payload.status.trim().parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidAccountStatus,
            "Invalid status value. Use Active, Inactive or Suspended",
        )
    })?;

    let user = UserRepository::new(state.db.clone())
        .set_status(&id, status)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        "User status updated",
        user.profile(),
    )))
}
