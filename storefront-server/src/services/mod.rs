//! 服务层 - 外部协作方客户端与 HTTP 应用装配
//!
//! - [`media`] - 图片 CDN (Cloudinary)
//! - [`mailer`] - 事务邮件 (Resend)
//! - [`identity`] - Google ID Token 校验
//! - [`https`] - 路由与中间件装配

pub mod https;
pub mod identity;
pub mod mailer;
pub mod media;

pub use identity::{GoogleVerifier, IdentityVerifier};
pub use mailer::{Mailer, ResendMailer};
pub use media::{CloudinaryClient, MediaStore, UploadFile};
