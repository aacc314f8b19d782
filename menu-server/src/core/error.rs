//! 启动错误
//!
//! 请求级错误统一使用 [`shared::error::AppError`]；这里只覆盖服务器
//! 初始化和运行期间无法恢复的错误。

use thiserror::Error;

use crate::auth::JwtError;
use crate::menu::StoreError;
use crate::tickets::TicketError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("数据库打开失败: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("菜单存储初始化失败: {0}")]
    MenuStore(#[from] StoreError),

    #[error("点单存储初始化失败: {0}")]
    TicketStore(#[from] TicketError),

    #[error("认证配置错误: {0}")]
    Jwt(#[from] JwtError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 服务器启动 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
