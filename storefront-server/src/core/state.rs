use std::sync::Arc;
use std::time::{Duration, Instant};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtService, RateLimiter};
use crate::core::{Config, ServerError};
use crate::db::DbService;
use crate::services::identity::{GoogleVerifier, IdentityVerifier};
use crate::services::mailer::{Mailer, ResendMailer};
use crate::services::media::{CloudinaryClient, MediaStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求 clone 一次。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | jwt_service | JWT 认证服务 |
/// | media | 图片 CDN |
/// | mailer | 事务邮件 |
/// | identity | Google 登录校验 (未配置时为 None) |
/// | rate_limiter | 按 IP 限流 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub media: Arc<dyn MediaStore>,
    pub mailer: Arc<dyn Mailer>,
    pub identity: Option<Arc<dyn IdentityVerifier>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub started_at: Instant,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("identity", &self.identity.is_some())
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 手动构造 (测试中注入替身服务)
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        media: Arc<dyn MediaStore>,
        mailer: Arc<dyn Mailer>,
        identity: Option<Arc<dyn IdentityVerifier>>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            db,
            jwt_service,
            media,
            mailer,
            identity,
            rate_limiter: Arc::new(RateLimiter::new()),
            started_at: Instant::now(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录
    /// 2. 打开数据库并建立索引
    /// 3. 创建 CDN / 邮件 / 身份校验客户端
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        config.ensure_work_dir_structure()?;

        let db_service = DbService::new(&config.database_dir()).await?;

        let timeout = Duration::from_millis(config.request_timeout_ms);
        let media = Arc::new(CloudinaryClient::new(config.cloudinary.clone(), timeout)?);
        if !config.cloudinary.is_configured() {
            tracing::warn!("Cloudinary credentials missing, image uploads will fail");
        }
        let mailer = Arc::new(ResendMailer::new(config.mail.clone(), timeout)?);

        let identity: Option<Arc<dyn IdentityVerifier>> = match &config.google_client_id {
            Some(client_id) => Some(Arc::new(GoogleVerifier::new(client_id.clone(), timeout)?)),
            None => {
                tracing::info!("GOOGLE_CLIENT_ID not set, Google sign-in disabled");
                None
            }
        };

        Ok(Self::new(
            config.clone(),
            db_service.db,
            media,
            mailer,
            identity,
        ))
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 启动后台任务 (限流表清理)
    pub fn start_background_tasks(&self) {
        let limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                limiter.cleanup(Duration::from_secs(120));
                tracing::trace!(entries = limiter.len(), "Rate limiter swept");
            }
        });
    }
}
