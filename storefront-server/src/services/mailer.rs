//! 事务邮件客户端 (Resend)

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::ServerError;
use crate::core::config::MailConfig;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail API key is not configured")]
    NotConfigured,

    #[error("Mail request failed: {0}")]
    Request(String),

    #[error("Mail API rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Request(err.to_string())
    }
}

/// 一封待发送的邮件
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message, returning the provider's message id
    async fn send(&self, message: EmailMessage) -> Result<String, MailError>;
}

#[derive(Debug, Clone)]
pub struct ResendMailer {
    http: reqwest::Client,
    config: MailConfig,
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: Option<String>,
    message: Option<String>,
}

impl ResendMailer {
    pub fn new(config: MailConfig, timeout: Duration) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<String, MailError> {
        if self.config.api_key.is_empty() {
            return Err(MailError::NotConfigured);
        }

        let payload = ResendPayload {
            from: &self.config.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let resp = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let body: ResendResponse = resp.json().await.unwrap_or(ResendResponse {
            id: None,
            message: None,
        });

        if !status.is_success() {
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message: body.message.unwrap_or_default(),
            });
        }

        let id = body.id.unwrap_or_default();
        tracing::info!(to = %message.to, subject = %message.subject, id = %id, "Email sent");
        Ok(id)
    }
}

/// 注册 / 更换邮箱时的验证码邮件
pub fn verification_email(to: &str, name: &str, otp: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Verify email from E-commerce Shodwe".to_string(),
        html: format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto;">
  <h2>Hi {name} Please Verify Your Email Address</h2>
  <p>Thank you for registering. Use the code below to verify your email address:</p>
  <p style="font-size: 24px; font-weight: bold; letter-spacing: 4px;">{otp}</p>
  <p>This code will expire soon. If you did not create an account, please ignore this email.</p>
</div>"#
        ),
        text: format!(
            "Hi {name} Please Verify Your Email Address\n\nYour verification code: {otp}"
        ),
    }
}

/// 找回密码验证码邮件
pub fn password_reset_email(to: &str, name: &str, otp: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Forgot password OTP from E-commerce Shodwe".to_string(),
        html: format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto;">
  <h2>Hi {name}</h2>
  <p>You requested a password reset. Use the code below to continue:</p>
  <p style="font-size: 24px; font-weight: bold; letter-spacing: 4px;">{otp}</p>
  <p>If you did not request this, you can safely ignore this email.</p>
</div>"#
        ),
        text: format!("Hi {name}\n\nYour password reset code: {otp}"),
    }
}
