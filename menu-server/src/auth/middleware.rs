//! 认证中间件
//!
//! 为编辑端写接口提供 JWT 认证

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 公开路由 (无需令牌)
///
/// - `GET /api/menu`、`GET /api/menu/{lang}`、`GET /api/menu/{lang}/locale` (菜单页面)
/// - `/api/orders` 全部方法 (点单页面)
pub fn is_public_api_route(method: &Method, path: &str) -> bool {
    if path == "/api/orders" || path.starts_with("/api/orders/") {
        return true;
    }

    if method != Method::GET {
        return false;
    }
    match path.strip_prefix("/api/menu") {
        Some("") | Some("/") => true,
        Some(rest) => match rest.strip_prefix('/') {
            Some(rest) => {
                let segments: Vec<&str> = rest.split('/').collect();
                matches!(segments.as_slice(), [_] | [_, "locale"])
            }
            None => false,
        },
        None => false,
    }
}

/// 认证中间件 - 要求编辑端登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展和响应扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/login`、`/ping`、`/health`、静态文件)
/// - [`is_public_api_route`] 列出的路由
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") && path != "/api" {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::not_authenticated());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user.clone());
            let mut response = next.run(req).await;
            // 供外层日志中间件读取
            response.extensions_mut().insert(user);
            Ok(response)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}
