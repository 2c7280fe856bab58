//! In-process test harness: in-memory database, fake collaborators, oneshot helpers

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::password::hash_secret;
use crate::core::{Config, ServerState};
use crate::db::models::{User, UserRole};
use crate::db::repository::{UserRepository, test_db};
use crate::services::https::build_router;
use crate::services::identity::{IdentityError, IdentityVerifier, VerifiedIdentity};
use crate::services::mailer::{EmailMessage, MailError, Mailer};
use crate::services::media::{MediaError, MediaStore, UploadFile, public_id_from_url};

pub const PASSWORD: &str = "secret-pass-1";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

/// Media store that hands out deterministic CDN URLs
#[derive(Default)]
pub struct FakeMedia {
    destroyed: Mutex<Vec<String>>,
}

impl FakeMedia {
    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for FakeMedia {
    async fn upload(&self, file: &UploadFile) -> Result<String, MediaError> {
        Ok(format!(
            "https://res.cloudinary.com/test/image/upload/v1700000000/{}",
            file.file_name
        ))
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

/// Mailer that keeps every message in memory
#[derive(Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl FakeMailer {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// The six-digit code from the latest message to `to`
    pub fn last_otp(&self, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .and_then(|m| {
                m.text
                    .split_whitespace()
                    .find(|w| w.len() == 6 && w.chars().all(|c| c.is_ascii_digit()))
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, message: EmailMessage) -> Result<String, MailError> {
        self.sent.lock().unwrap().push(message);
        Ok("fake-id".into())
    }
}

/// Accepts only the token "good-token"
pub struct FakeIdentity;

#[async_trait]
impl IdentityVerifier for FakeIdentity {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        if id_token == "good-token" {
            Ok(VerifiedIdentity {
                email: "google.user@example.com".into(),
                name: "Google User".into(),
                picture: Some("https://lh3.example.com/p.png".into()),
            })
        } else {
            Err(IdentityError::Rejected("bad token".into()))
        }
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// field, file name; content is a tiny PNG
    File(&'a str, &'a str),
}

pub struct TestApp {
    pub state: ServerState,
    pub router: Router,
    pub media: Arc<FakeMedia>,
    pub mailer: Arc<FakeMailer>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(false).await
    }

    pub async fn with_google() -> Self {
        Self::build(true).await
    }

    async fn build(google: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_tests(dir.path().to_string_lossy().to_string());
        let media = Arc::new(FakeMedia::default());
        let mailer = Arc::new(FakeMailer::default());
        let identity: Option<Arc<dyn IdentityVerifier>> = if google {
            Some(Arc::new(FakeIdentity))
        } else {
            None
        };
        let state = ServerState::new(
            config,
            test_db::memory().await,
            media.clone(),
            mailer.clone(),
            identity,
        );
        let router = build_router(state.clone());
        Self {
            state,
            router,
            media,
            mailer,
            _dir: dir,
        }
    }

    /// Insert a verified, active user and return it with an access token
    pub async fn user(&self, name: &str, email: &str, role: UserRole) -> (User, String) {
        let user: User = serde_json::from_value(serde_json::json!({
            "name": name,
            "email": email,
            "password": hash_secret(PASSWORD).unwrap(),
            "verifyEmail": true,
            "role": role,
        }))
        .unwrap();
        let user = UserRepository::new(self.state.db.clone())
            .create(user)
            .await
            .unwrap();
        let token = self
            .state
            .jwt_service
            .generate_access_token(&user.id_string(), &user.email, user.role)
            .unwrap();
        (user, token)
    }

    pub async fn admin(&self) -> (User, String) {
        self.user("Admin", "admin@example.com", UserRole::Admin).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, body)
    }

    /// JSON request with an optional bearer token
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, _, body) = self.send(request).await;
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body), token).await
    }

    pub async fn put(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(body), token).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None, token).await
    }

    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        parts: &[Part<'_>],
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        const BOUNDARY: &str = "storefront-test-boundary";
        let mut body: Vec<u8> = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(PNG_BYTES);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder().method(method).uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let (status, _, body) = self.send(builder.body(Body::from(body)).unwrap()).await;
        (status, body)
    }
}

/// Public id the fake CDN assigns to an uploaded file name
pub fn fake_public_id(file_name: &str) -> String {
    public_id_from_url(&format!(
        "https://res.cloudinary.com/test/image/upload/v1700000000/{}",
        file_name
    ))
    .unwrap_or_default()
}
