//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// 用户角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

/// 账户状态，只有 Active 可以登录
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl std::str::FromStr for UserStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            "Suspended" => Ok(Self::Suspended),
            _ => Err(()),
        }
    }
}

/// What the stored OTP was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    VerifyEmail,
    ResetPassword,
}

/// User document as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    /// Argon2 hash, empty for Google-only accounts
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub verify_email: bool,
    #[serde(default)]
    pub last_login_date: Option<i64>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub role: UserRole,
    /// Argon2 hash of the pending OTP
    #[serde(default)]
    pub otp: Option<String>,
    #[serde(default)]
    pub otp_expires: Option<i64>,
    #[serde(default)]
    pub otp_attempts: u32,
    #[serde(default)]
    pub otp_purpose: Option<OtpPurpose>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub password_reset_verified: bool,
    #[serde(default)]
    pub refresh_token_id: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub sign_up_with_google: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl User {
    /// A fresh, unverified, active USER account
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            name,
            email,
            password: password_hash,
            avatar: String::new(),
            mobile: None,
            verify_email: false,
            last_login_date: None,
            status: UserStatus::Active,
            role: UserRole::User,
            otp: None,
            otp_expires: None,
            otp_attempts: 0,
            otp_purpose: None,
            password_reset_verified: false,
            refresh_token_id: None,
            sign_up_with_google: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// "user:xxx"
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Public view of a user; never carries password, OTP or token ids
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub mobile: Option<String>,
    pub verify_email: bool,
    pub last_login_date: Option<i64>,
    pub status: UserStatus,
    pub role: UserRole,
    pub sign_up_with_google: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            mobile: user.mobile.clone(),
            verify_email: user.verify_email,
            last_login_date: user.last_login_date,
            status: user.status,
            role: user.role,
            sign_up_with_google: user.sign_up_with_google,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Email + OTP, used by both verification flows
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Profile update; `password` is rehashed before it is stored
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserUpdateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub mobile: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
}

/// Columns written by a profile update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_email: Option<bool>,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Google ID token exchange
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAuthRequest {
    #[serde(default, alias = "credential", alias = "id_token")]
    pub id_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "ADMIN");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"USER\"").unwrap(),
            UserRole::User
        );
    }

    #[test]
    fn test_profile_hides_secrets() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "user:ann",
            "name": "Ann",
            "email": "ann@example.com",
            "password": "$argon2id$hash",
            "otp": "$argon2id$otp",
            "refreshTokenId": "jti",
            "verifyEmail": true,
        }))
        .unwrap();
        let json = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(json["id"], "user:ann");
        assert_eq!(json["verifyEmail"], true);
        assert_eq!(json["status"], "Active");
        assert!(json.get("password").is_none());
        assert!(json.get("otp").is_none());
        assert!(json.get("refreshTokenId").is_none());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Suspended".parse::<UserStatus>(), Ok(UserStatus::Suspended));
        assert!("active".parse::<UserStatus>().is_err());
    }
}
