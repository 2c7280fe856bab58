//! Per-IP rate limiting for credential and OTP routes
//!
//! Fixed window per `(policy, ip)`. Handlers take a [`ClientIp`] and call
//! [`RateLimiter::enforce`] before touching the database.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use dashmap::DashMap;

use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// A named request budget
#[derive(Debug, Clone, Copy)]
pub struct RatePolicy {
    pub name: &'static str,
    pub max_requests: u32,
    pub window: Duration,
}

/// Login: 10 requests/minute per IP
pub const LOGIN: RatePolicy = RatePolicy {
    name: "login",
    max_requests: 10,
    window: Duration::from_secs(60),
};

/// Registration and Google sign-in: 5 requests/minute per IP
pub const REGISTER: RatePolicy = RatePolicy {
    name: "register",
    max_requests: 5,
    window: Duration::from_secs(60),
};

/// OTP issue and verification: 5 requests/minute per IP
pub const OTP: RatePolicy = RatePolicy {
    name: "otp",
    max_requests: 5,
    window: Duration::from_secs(60),
};

#[derive(Debug)]
struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Debug, Default)]
pub struct RateLimiter {
    entries: DashMap<(&'static str, String), IpEntry>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub fn check(&self, policy: RatePolicy, ip: &str) -> bool {
        self.check_at(policy, ip, Instant::now())
    }

    fn check_at(&self, policy: RatePolicy, ip: &str, now: Instant) -> bool {
        let mut entry = self
            .entries
            .entry((policy.name, ip.to_owned()))
            .or_insert_with(|| IpEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) >= policy.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= policy.max_requests
    }

    /// `check` that maps a refusal to a 429 and records it
    pub fn enforce(&self, policy: RatePolicy, ip: &ClientIp) -> Result<(), AppError> {
        if self.check(policy, &ip.0) {
            return Ok(());
        }
        security_log!("WARN", "rate_limited", route = policy.name, ip = ip.0.as_str());
        Err(AppError::too_many_requests())
    }

    /// Remove entries whose window started more than `max_age` ago
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < max_age);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Client IP used as the rate-limit key
///
/// The peer address from `ConnectInfo`. The first `X-Forwarded-For` entry
/// replaces it only when `TRUST_PROXY` is set, since clients can write that
/// header freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_parts(parts: &Parts, trust_proxy: bool) -> Self {
        if trust_proxy
            && let Some(forwarded) = parts.headers.get("x-forwarded-for")
            && let Ok(val) = forwarded.to_str()
            && let Some(first) = val.split(',').next()
        {
            let ip = first.trim();
            if !ip.is_empty() {
                return ClientIp(ip.to_owned());
            }
        }

        ClientIp(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string())
                .unwrap_or_else(|| "unknown".to_owned()),
        )
    }
}

impl FromRequestParts<ServerState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        Ok(ClientIp::from_parts(parts, state.config.trust_proxy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_within_window() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        for _ in 0..OTP.max_requests {
            assert!(limiter.check_at(OTP, "1.2.3.4", now));
        }
        assert!(!limiter.check_at(OTP, "1.2.3.4", now));
        // Other IPs and other policies keep their own budget
        assert!(limiter.check_at(OTP, "5.6.7.8", now));
        assert!(limiter.check_at(LOGIN, "1.2.3.4", now));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        for _ in 0..=REGISTER.max_requests {
            limiter.check_at(REGISTER, "ip", start);
        }
        assert!(!limiter.check_at(REGISTER, "ip", start));
        assert!(limiter.check_at(REGISTER, "ip", start + REGISTER.window));
    }

    #[test]
    fn test_enforce_returns_429() {
        let limiter = RateLimiter::new();
        let ip = ClientIp("9.9.9.9".into());
        for _ in 0..OTP.max_requests {
            limiter.enforce(OTP, &ip).unwrap();
        }
        let err = limiter.enforce(OTP, &ip).unwrap_err();
        assert_eq!(err.http_status(), http::StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_cleanup() {
        let limiter = RateLimiter::new();
        limiter.check(LOGIN, "a");
        limiter.check(LOGIN, "b");
        assert_eq!(limiter.len(), 2);
        limiter.cleanup(Duration::from_secs(300));
        assert_eq!(limiter.len(), 2);
        limiter.cleanup(Duration::ZERO);
        assert!(limiter.is_empty());
    }

    fn parts(req: http::Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn test_forwarded_header_needs_trusted_proxy() {
        let mut req = http::Request::builder()
            .header("x-forwarded-for", "10.0.0.1, 172.16.0.1")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 7], 4000))));
        let parts = parts(req);

        assert_eq!(ClientIp::from_parts(&parts, true), ClientIp("10.0.0.1".into()));
        assert_eq!(
            ClientIp::from_parts(&parts, false),
            ClientIp("192.168.1.7".into())
        );
    }

    #[test]
    fn test_client_ip_unknown_without_peer() {
        let req = http::Request::builder()
            .header("x-forwarded-for", "10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(ClientIp::from_parts(&parts(req), false).0, "unknown");
    }
}
