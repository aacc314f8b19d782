//! Order Ticket API 模块
//!
//! 点单页面使用，无需认证。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", put(handler::update_status).delete(handler::delete))
}
