//! 认证 Cookie
//!
//! 访问令牌和刷新令牌以 HttpOnly Cookie 下发，跨站前端需要 `SameSite=None`。

use axum::http::{HeaderMap, HeaderValue, header};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// 构造 Set-Cookie 值
pub fn build_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=None; Max-Age={}",
        max_age_secs.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// 构造清除 Cookie 的 Set-Cookie 值
pub fn clear_cookie(name: &str, secure: bool) -> String {
    build_cookie(name, "", 0, secure)
}

/// 追加 Set-Cookie 头 (非法字符的值会被跳过并记录)
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: String) {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::warn!("Skipping invalid Set-Cookie value: {}", e),
    }
}

/// 从 Cookie 头读取指定名称的值
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 优先读取 Cookie，其次 `Authorization: Bearer`
pub fn token_from_request(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    read_cookie(headers, cookie_name).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(crate::auth::JwtService::extract_from_header)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cookie() {
        let c = build_cookie(ACCESS_COOKIE, "abc", 60, true);
        assert_eq!(
            c,
            "accessToken=abc; Path=/; HttpOnly; SameSite=None; Max-Age=60; Secure"
        );
        let c = build_cookie(ACCESS_COOKIE, "abc", 60, false);
        assert!(!c.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie() {
        let c = clear_cookie(REFRESH_COOKIE, true);
        assert!(c.starts_with("refreshToken=;"));
        assert!(c.contains("Max-Age=0"));
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; accessToken=tok123; refreshToken=r1"),
        );
        assert_eq!(read_cookie(&headers, ACCESS_COOKIE).as_deref(), Some("tok123"));
        assert_eq!(read_cookie(&headers, REFRESH_COOKIE).as_deref(), Some("r1"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_token_prefers_cookie_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer hdr"));
        assert_eq!(
            token_from_request(&headers, ACCESS_COOKIE).as_deref(),
            Some("hdr")
        );

        headers.insert(header::COOKIE, HeaderValue::from_static("accessToken=ck"));
        assert_eq!(
            token_from_request(&headers, ACCESS_COOKIE).as_deref(),
            Some("ck")
        );
    }

    #[test]
    fn test_empty_cookie_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("accessToken="));
        assert_eq!(token_from_request(&headers, ACCESS_COOKIE), None);
    }
}
