use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置 - 商城后端的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (database/, logs/) |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | MAX_BODY_MB | 50 | 请求体上限 (含文件上传) |
/// | REQUEST_TIMEOUT_MS | 30000 | 外部调用超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时(毫秒) |
/// | COOKIE_SECURE | true | 认证 Cookie 的 Secure 标记 |
/// | CORS_ORIGINS | http://localhost:5173,http://localhost:5174 | 允许携带凭据的前端来源 (逗号分隔) |
/// | TRUST_PROXY | false | 是否信任 X-Forwarded-For (仅在反向代理之后开启) |
/// | OTP_TTL_MINUTES | 10 | 验证码有效期 |
/// | OTP_MAX_ATTEMPTS | 5 | 验证码最大尝试次数 |
/// | CLOUDINARY_CLOUD_NAME / CLOUDINARY_API_KEY / CLOUDINARY_API_SECRET | - | 图片 CDN |
/// | RESEND_API_KEY | - | 邮件 API |
/// | EMAIL_FROM | E-commerce Shodwe <noreply@resend.dev> | 发件人 |
/// | GOOGLE_CLIENT_ID | - | 设置后启用 Google 登录 |
///
/// JWT 相关变量见 [`JwtConfig::from_env`]。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/shop HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    /// 请求体上限 (MB)
    pub max_body_mb: usize,
    /// 外部服务调用超时 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    pub cookie_secure: bool,
    /// 允许的前端来源，CORS 只对这些来源放行凭据
    pub cors_origins: Vec<String>,
    /// 限流取 IP 时是否采信 X-Forwarded-For
    pub trust_proxy: bool,
    pub otp_ttl_minutes: i64,
    pub otp_max_attempts: u32,
    pub cloudinary: CloudinaryConfig,
    pub mail: MailConfig,
    /// Google OAuth client id; Google sign-in is disabled when unset
    pub google_client_id: Option<String>,
}

/// 图片 CDN 凭据
#[derive(Debug, Clone, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl CloudinaryConfig {
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// 邮件 API 配置
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub from: String,
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

/// Splits a comma separated origin list, dropping blanks and trailing slashes
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Reads a secret that must be present outside development.
fn require_secret(name: &str, environment: &str) -> Result<String, ServerError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ if environment == "development" => {
            tracing::warn!("{name} not set, related feature will fail at call time");
            Ok(String::new())
        }
        _ => Err(ServerError::Config(format!(
            "{name} must be set when ENVIRONMENT={environment}"
        ))),
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 非开发环境下缺失密钥会返回错误
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(&environment)?;

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 8000),
            jwt,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            max_body_mb: env_or("MAX_BODY_MB", 50),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30000),
            shutdown_timeout_ms: env_or("SHUTDOWN_TIMEOUT_MS", 10000),
            cookie_secure: env_or("COOKIE_SECURE", true),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            trust_proxy: env_or("TRUST_PROXY", false),
            otp_ttl_minutes: env_or("OTP_TTL_MINUTES", 10),
            otp_max_attempts: env_or("OTP_MAX_ATTEMPTS", 5),
            cloudinary: CloudinaryConfig {
                cloud_name: require_secret("CLOUDINARY_CLOUD_NAME", &environment)?,
                api_key: require_secret("CLOUDINARY_API_KEY", &environment)?,
                api_secret: require_secret("CLOUDINARY_API_SECRET", &environment)?,
            },
            mail: MailConfig {
                api_key: require_secret("RESEND_API_KEY", &environment)?,
                from: std::env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "E-commerce Shodwe <noreply@resend.dev>".into()),
            },
            google_client_id: std::env::var("GOOGLE_CLIENT_ID")
                .ok()
                .filter(|v| !v.is_empty()),
            environment,
        })
    }

    /// 测试用配置 (固定密钥，不读取环境变量)
    pub fn for_tests(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-at-least-32-bytes-long".into(),
                access_minutes: 300,
                refresh_days: 7,
                issuer: "storefront-server".into(),
                audience: "storefront-clients".into(),
            },
            environment: "test".into(),
            log_level: "debug".into(),
            log_json: false,
            max_body_mb: 50,
            request_timeout_ms: 5000,
            shutdown_timeout_ms: 1000,
            cookie_secure: true,
            cors_origins: vec!["http://localhost:5173".into()],
            trust_proxy: false,
            otp_ttl_minutes: 10,
            otp_max_attempts: 5,
            cloudinary: CloudinaryConfig::default(),
            mail: MailConfig {
                api_key: String::new(),
                from: "Test <noreply@example.com>".into(),
            },
            google_client_id: None,
        }
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
