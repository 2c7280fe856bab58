//! Google 登录 ID Token 校验
//!
//! 通过 Google tokeninfo 端点校验，要求 `aud` 等于配置的 client id 且邮箱已验证。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::core::ServerError;

const TOKENINFO_ENDPOINT: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity token rejected: {0}")]
    Rejected(String),

    #[error("Identity provider unreachable: {0}")]
    Request(String),
}

/// 已验证的外部身份
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

#[derive(Debug, Clone)]
pub struct GoogleVerifier {
    http: reqwest::Client,
    client_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    email: Option<String>,
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleVerifier {
    pub fn new(client_id: String, timeout: Duration) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, client_id })
    }
}

fn check_token_info(info: TokenInfo, client_id: &str) -> Result<VerifiedIdentity, IdentityError> {
    if info.aud.as_deref() != Some(client_id) {
        return Err(IdentityError::Rejected("audience mismatch".into()));
    }
    if info.email_verified.as_deref() != Some("true") {
        return Err(IdentityError::Rejected("email not verified".into()));
    }
    let email = info
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| IdentityError::Rejected("email missing".into()))?;
    let name = info
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    Ok(VerifiedIdentity {
        email,
        name,
        picture: info.picture,
    })
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let resp = self
            .http
            .get(TOKENINFO_ENDPOINT)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(IdentityError::Rejected(format!(
                "tokeninfo answered {}",
                resp.status()
            )));
        }

        let info: TokenInfo = resp
            .json()
            .await
            .map_err(|e| IdentityError::Rejected(e.to_string()))?;
        check_token_info(info, &self.client_id)
    }
}
