//! Server Implementation
//!
//! HTTP 服务器组装、启动和关闭

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::auth::require_auth;
use crate::core::{Config, Result, ServerState};
use crate::middleware::logging_middleware;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// UUID 请求 ID 生成器
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// 注册所有路由 (无中间件、无状态)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // 公共路由: /ping, /health
        .merge(api::health::router())
        // 公共路由: /login
        .merge(api::auth::router())
        // 读取公开，写入需要认证
        .merge(api::menu::router())
        // 需要认证
        .merge(api::prices::router())
        // 公共路由 (点单页面)
        .merge(api::orders::router())
}

/// 组装完整应用: 路由 + 中间件 + 状态 + 静态页面
///
/// HTTP 服务器和集成测试共用
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        // 静态页面 (菜单、编辑器、点单)
        .fallback_service(ServeDir::new(&state.config.static_dir))
        // 认证 - 最内层，注入 CurrentUser
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        // 请求 ID - 最外层，日志中间件可见
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state.clone())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// 使用已有状态创建服务器
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };

        match state.menus.languages() {
            Ok(languages) => tracing::info!(languages = ?languages, "Menus available"),
            Err(e) => tracing::warn!(error = %e, "Could not list stored menus"),
        }

        let app = build_app(&state);
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("🍽️  Menu server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down...");
}
