//! JWT 令牌服务
//!
//! 处理访问令牌和刷新令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::ServerError;
use crate::db::models::{UserRole, UserStatus};

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字节)
    pub secret: String,
    /// 访问令牌有效期 (分钟)
    pub access_minutes: i64,
    /// 刷新令牌有效期 (天)
    pub refresh_days: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// | 环境变量 | 默认值 |
    /// |----------|--------|
    /// | JWT_SECRET | 开发环境随机生成 |
    /// | JWT_ACCESS_MINUTES | 300 |
    /// | JWT_REFRESH_DAYS | 7 |
    /// | JWT_ISSUER | storefront-server |
    /// | JWT_AUDIENCE | storefront-clients |
    pub fn from_env(environment: &str) -> Result<Self, ServerError> {
        let secret = load_jwt_secret(environment)
            .map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            secret,
            access_minutes: std::env::var("JWT_ACCESS_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
            refresh_days: std::env::var("JWT_REFRESH_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "storefront-clients".to_string()),
        })
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject, "user:xxx")
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// 令牌类型: access | refresh
    pub token_type: String,
    /// 令牌 ID (刷新令牌吊销用)
    pub jti: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌类型错误: 期望 {expected}")]
    WrongTokenType { expected: &'static str },

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> Result<String, JwtError> {
    const ALLOWED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes)
        .map_err(|_| JwtError::ConfigError("Failed to generate secure random key".to_string()))?;

    Ok(bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect())
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret(environment: &str) -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) if environment == "development" => {
            tracing::warn!("⚠️  JWT_SECRET not set! Generating temporary key for development.");
            generate_secure_printable_jwt_secret()
        }
        Err(_) => Err(JwtError::ConfigError(format!(
            "JWT_SECRET environment variable must be set when ENVIRONMENT={environment}"
        ))),
    }
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn sign(
        &self,
        user_id: &str,
        email: &str,
        role: UserRole,
        token_type: &str,
        jti: String,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            token_type: token_type.to_string(),
            jti,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 生成访问令牌
    pub fn generate_access_token(
        &self,
        user_id: &str,
        email: &str,
        role: UserRole,
    ) -> Result<String, JwtError> {
        self.sign(
            user_id,
            email,
            role,
            ACCESS_TOKEN,
            uuid::Uuid::new_v4().to_string(),
            Duration::minutes(self.config.access_minutes),
        )
    }

    /// 生成刷新令牌，`jti` 需保存到用户记录以便吊销
    pub fn generate_refresh_token(
        &self,
        user_id: &str,
        email: &str,
        role: UserRole,
        jti: &str,
    ) -> Result<String, JwtError> {
        self.sign(
            user_id,
            email,
            role,
            REFRESH_TOKEN,
            jti.to_string(),
            Duration::days(self.config.refresh_days),
        )
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 验证访问令牌 (拒绝刷新令牌)
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != ACCESS_TOKEN {
            return Err(JwtError::WrongTokenType {
                expected: ACCESS_TOKEN,
            });
        }
        Ok(claims)
    }

    /// 验证刷新令牌 (拒绝访问令牌)
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != REFRESH_TOKEN {
            return Err(JwtError::WrongTokenType {
                expected: REFRESH_TOKEN,
            });
        }
        Ok(claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// 访问令牌 Cookie 的 Max-Age (秒)
    pub fn access_max_age_secs(&self) -> i64 {
        self.config.access_minutes * 60
    }

    /// 刷新令牌 Cookie 的 Max-Age (秒)
    pub fn refresh_max_age_secs(&self) -> i64 {
        self.config.refresh_days * 24 * 60 * 60
    }
}

/// 当前用户上下文
///
/// 由 [`crate::auth::extractor`] 在验证令牌并查询用户后创建
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID ("user:xxx")
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 本人或管理员可操作
    pub fn can_act_for(&self, user_id: &str) -> bool {
        self.is_admin() || self.id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-at-least-32-bytes-long".into(),
            access_minutes: 300,
            refresh_days: 7,
            issuer: "storefront-server".into(),
            audience: "storefront-clients".into(),
        })
    }

    #[test]
    fn test_access_token_roundtrip() {
        let jwt = service();
        let token = jwt
            .generate_access_token("user:abc", "a@example.com", UserRole::User)
            .unwrap();
        let claims = jwt.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, "user:abc");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.token_type, ACCESS_TOKEN);
        assert_eq!(claims.exp - claims.iat, 300 * 60);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let jwt = service();
        let refresh = jwt
            .generate_refresh_token("user:abc", "a@example.com", UserRole::Admin, "jti-1")
            .unwrap();
        let access = jwt
            .generate_access_token("user:abc", "a@example.com", UserRole::Admin)
            .unwrap();

        assert!(matches!(
            jwt.validate_access_token(&refresh),
            Err(JwtError::WrongTokenType { .. })
        ));
        assert!(matches!(
            jwt.validate_refresh_token(&access),
            Err(JwtError::WrongTokenType { .. })
        ));
        assert_eq!(jwt.validate_refresh_token(&refresh).unwrap().jti, "jti-1");
    }

    #[test]
    fn test_expired_token() {
        let mut config = service().config;
        config.access_minutes = -10;
        let jwt = JwtService::with_config(config);
        let token = jwt
            .generate_access_token("user:abc", "a@example.com", UserRole::User)
            .unwrap();
        assert!(matches!(
            jwt.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service()
            .generate_access_token("user:abc", "a@example.com", UserRole::User)
            .unwrap();
        let mut config = service().config;
        config.secret = "another-secret-key-that-is-at-least-32-bytes".into();
        let other = JwtService::with_config(config);
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_secure_printable_jwt_secret().unwrap();
        let b = generate_secure_printable_jwt_secret().unwrap();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_current_user_access() {
        let user = CurrentUser {
            id: "user:1".into(),
            name: "Ann".into(),
            email: "ann@example.com".into(),
            role: UserRole::User,
            status: UserStatus::Active,
        };
        assert!(user.can_act_for("user:1"));
        assert!(!user.can_act_for("user:2"));

        let admin = CurrentUser {
            role: UserRole::Admin,
            ..user
        };
        assert!(admin.can_act_for("user:2"));
    }
}
