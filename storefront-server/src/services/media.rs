//! 图片 CDN 客户端
//!
//! [`MediaStore`] 抽象上传与删除，生产实现为 Cloudinary 签名 REST API。

use std::time::Duration;

use async_trait::async_trait;
use ring::digest;
use serde::Deserialize;
use thiserror::Error;

use crate::core::ServerError;
use crate::core::config::CloudinaryConfig;

/// A file received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Form field name ("images", "avatar", ...)
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media storage is not configured")]
    NotConfigured,

    #[error("Media request failed: {0}")]
    Request(String),

    #[error("Media host rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected media host response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        MediaError::Request(err.to_string())
    }
}

/// Image hosting backend
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload one file and return its public https URL
    async fn upload(&self, file: &UploadFile) -> Result<String, MediaError>;

    /// Delete an asset by its public id
    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}

/// Cloudinary signed upload API
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: Option<String>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Config(format!("Failed to build HTTP client: {}", e)))?;
        let base_url = format!("https://api.cloudinary.com/v1_1/{}/image", config.cloud_name);
        Ok(Self {
            http,
            config,
            base_url,
        })
    }

    fn ensure_configured(&self) -> Result<(), MediaError> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(MediaError::NotConfigured)
        }
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, file: &UploadFile) -> Result<String, MediaError> {
        self.ensure_configured()?;

        let timestamp = Self::timestamp();
        let params = [
            ("overwrite", "false".to_string()),
            ("timestamp", timestamp.clone()),
            ("unique_filename", "false".to_string()),
            ("use_filename", "true".to_string()),
        ];
        let signature = sign_params(&params, &self.config.api_secret);

        let mime = file
            .content_type
            .clone()
            .unwrap_or_else(|| {
                mime_guess::from_path(&file.file_name)
                    .first_or_octet_stream()
                    .to_string()
            });
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&mime)?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }

        let resp = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message: body.error.map(|e| e.message).unwrap_or_default(),
            });
        }
        body.secure_url
            .ok_or_else(|| MediaError::InvalidResponse("missing secure_url".to_string()))
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        self.ensure_configured()?;

        let timestamp = Self::timestamp();
        let params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
        ];
        let signature = sign_params(&params, &self.config.api_secret);

        let mut form: Vec<(&str, String)> = params.to_vec();
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));

        let resp = self
            .http
            .post(format!("{}/destroy", self.base_url))
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let body: DestroyResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message: body.error.map(|e| e.message).unwrap_or_default(),
            });
        }
        tracing::debug!(public_id, result = ?body.result, "Media asset destroyed");
        Ok(())
    }
}

/// Cloudinary request signature
///
/// SHA-1 hex of `k1=v1&k2=v2...` (keys sorted) followed by the API secret.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let hash = digest::digest(
        &digest::SHA1_FOR_LEGACY_USE_ONLY,
        format!("{}{}", joined, api_secret).as_bytes(),
    );
    hex::encode(hash.as_ref())
}

/// Public id of a CDN asset from its delivery URL
///
/// `https://res.cloudinary.com/demo/image/upload/v1712/shop/phone.png?x=1`
/// gives `shop/phone`. URLs without `/upload/` fall back to the last path
/// segment without its extension.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url).trim();
    if path.is_empty() {
        return None;
    }

    let tail = match path.split_once("/upload/") {
        Some((_, after)) => strip_version(after),
        None => path.rsplit('/').next().unwrap_or(path),
    };

    let without_ext = match tail.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() && !stem.ends_with('/') => stem,
        _ => tail,
    };

    if without_ext.is_empty() {
        None
    } else {
        Some(without_ext.to_string())
    }
}

fn strip_version(path: &str) -> &str {
    if let Some((first, rest)) = path.split_once('/')
        && let Some(digits) = first.strip_prefix('v')
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
    {
        return rest;
    }
    path
}
