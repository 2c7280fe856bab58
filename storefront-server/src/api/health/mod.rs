//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | / | GET | 存活提示 | 无 |
//! | /health | GET | 版本与运行时间 | 无 |

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::extract::Json;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

#[derive(Serialize)]
pub struct RootResponse {
    message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | error)
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

async fn root(State(state): State<ServerState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("Server is running on port {}", state.config.http_port),
    })
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let status = match state.db.health().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            "error"
        }
    };
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
}
