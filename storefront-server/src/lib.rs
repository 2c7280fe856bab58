//! Storefront Server - 电商店铺与管理后台 REST 服务
//!
//! # 架构概述
//!
//! 请求路径: 路由 → 认证提取 (JWT Cookie/Header + 用户查询) → 处理器 → 文档库 → JSON 信封
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 + 按 IP 限流
//! - **外部服务** (`services`): 图片 CDN、事务邮件、Google 登录
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT、Cookie、密码、限流、提取器
//! ├── services/      # CDN、邮件、身份校验、路由装配
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、分页、表单、分类树、报表
//! └── db/            # 模型与仓储
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export 公共类型
pub use auth::{AdminUser, CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env，初始化日志 (控制台 + `WORK_DIR/logs` 滚动文件)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    init_logger_with_file(&level, json, log_dir.to_str())?;
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __                  ____                 __
  / ___// /_____  ________  / __/________  ____  / /_
  \__ \/ __/ __ \/ ___/ _ \/ /_/ ___/ __ \/ __ \/ __/
 ___/ / /_/ /_/ / /  /  __/ __/ /  / /_/ / / / / /_
/____/\__/\____/_/   \___/_/ /_/   \____/_/ /_/\__/
    "#
    );
}
