//! Menu Server - 多语言餐厅菜单服务
//!
//! # 架构概述
//!
//! - **菜单** (`menu`): 菜单树存储、价格同步、内容编辑、批量导入
//! - **点单** (`tickets`): 点单存储
//! - **数据库** (`db`): 嵌入式 redb 存储 (菜单和点单共用一个文件)
//! - **认证** (`auth`): JWT + Argon2 编辑端认证
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! menu-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、编辑端账号
//! ├── api/           # HTTP 路由和处理器
//! ├── menu/          # 菜单领域
//! ├── tickets/       # 点单
//! ├── middleware/    # 请求日志
//! ├── utils/         # 日志、时间、校验
//! ├── db/            # 数据库打开
//! └── bin/           # menu-loader 命令行工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod menu;
pub mod middleware;
pub mod tickets;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use menu::{MenuService, MenuStore, RedbMenuStore};
pub use tickets::TicketStorage;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

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

/// 准备运行环境
///
/// 1. 加载 `.env`
/// 2. 创建工作目录
/// 3. 初始化日志
pub fn setup_environment() -> std::io::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  ____  __  __
  / /|_/ / _ \/ __ \/ / / /
 / /  / /  __/ / / / /_/ /
/_/  /_/\___/_/ /_/\__,_/
    "#
    );
}
