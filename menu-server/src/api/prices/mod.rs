//! Price API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/prices/{lang} | GET | 价格表 (所有层级的菜品) |
//! | /api/prices/update | POST | 按菜品名同步价格到所有语言 (`?includeOptions=true` 同时更新选项) |
//! | /api/prices/update-by-id | POST | 按菜品 ID 同步价格到所有语言 |
//!
//! 全部需要认证。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/prices", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // 固定路径放在 /{lang} 之前
        .route("/update", post(handler::update_by_name))
        .route("/update-by-id", post(handler::update_by_id))
        .route("/{lang}", get(handler::price_table))
}
