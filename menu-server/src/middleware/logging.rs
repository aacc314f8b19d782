//! 请求日志中间件
//!
//! 记录所有进入的 HTTP 请求，包含请求 ID、用户和状态码

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::auth::CurrentUser;

/// 请求日志中间件
///
/// 请求结束时记录一条日志：
/// - 请求 ID (x-request-id)
/// - HTTP 方法和路由
/// - 用户代理
/// - 认证用户 (由认证中间件放入响应扩展)
/// - 响应状态码和耗时
///
/// 4xx/5xx 使用 warn 级别。
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let response = next.run(req).await;

    let latency_ms = start.elapsed().as_millis();
    let status = response.status();
    let user = response
        .extensions()
        .get::<CurrentUser>()
        .map(|u| u.username.clone());

    if status.is_server_error() || status.is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = %latency_ms,
            user = ?user,
            user_agent = %user_agent,
            "Request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = %latency_ms,
            user = ?user,
            "Request completed"
        );
    }

    response
}
