//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] / [`AdminUser`] - 请求提取器
//! - [`cookies`] - 认证 Cookie 读写
//! - [`password`] - Argon2 密码与 OTP 哈希
//! - [`RateLimiter`] - 按 IP 的固定窗口限流

pub mod cookies;
pub mod extractor;
pub mod jwt;
pub mod password;
pub mod rate_limit;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use rate_limit::{ClientIp, RatePolicy, RateLimiter};
