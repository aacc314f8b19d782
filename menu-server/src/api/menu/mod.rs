//! Menu API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/menu | GET | 已存储的语言列表 | 无 |
//! | /api/menu/{lang} | GET | 读取整份菜单 | 无 |
//! | /api/menu/{lang} | POST | 保存整份菜单 (`?expectedRevision=`) | 需要 |
//! | /api/menu/{lang}/editor | GET | 内容编辑视图 | 需要 |
//! | /api/menu/{lang}/editor | PUT | 内容编辑写回 | 需要 |
//! | /api/menu/{lang}/locale | GET | 文字方向和健康提示 | 无 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{lang}", get(handler::get_by_lang).post(handler::save))
        .route(
            "/{lang}/editor",
            get(handler::editor_view).put(handler::apply_edits),
        )
        .route("/{lang}/locale", get(handler::locale))
}
