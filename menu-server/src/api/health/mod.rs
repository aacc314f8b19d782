//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /ping | GET | 存活检查 (登录页的服务器状态按钮) | 无 |
//! | /health | GET | 健康检查 | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "languages": 12
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | degraded)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 已存储的语言数量 (存储不可用时省略)
    #[serde(skip_serializing_if = "Option::is_none")]
    languages: Option<usize>,
}

/// GET /ping - 存活检查
async fn ping() -> &'static str {
    "pong"
}

/// GET /health - 健康检查
async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let languages = match state.menus.languages() {
        Ok(languages) => Some(languages.len()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not read the menu store");
            None
        }
    };

    Json(HealthResponse {
        status: if languages.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        languages,
    })
}
