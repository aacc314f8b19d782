use std::sync::Arc;

use redb::Database;

use crate::auth::{AdminCredentials, JwtConfig, JwtService};
use crate::core::{Config, Result};
use crate::menu::{MenuService, RedbMenuStore};
use crate::tickets::TicketStorage;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一份的成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | menus | MenuService | 菜单读写、价格同步、内容编辑 |
/// | tickets | TicketStorage | 点单存储 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | credentials | Arc<AdminCredentials> | 编辑端账号 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub menus: MenuService,
    pub tickets: TicketStorage,
    pub jwt_service: Arc<JwtService>,
    pub credentials: Arc<AdminCredentials>,
}

impl ServerState {
    /// 在已打开的数据库上组装状态
    pub fn new(
        config: Config,
        db: Arc<Database>,
        jwt_service: Arc<JwtService>,
        credentials: AdminCredentials,
    ) -> Result<Self> {
        let menus = MenuService::new(Arc::new(RedbMenuStore::new(db.clone())?));
        let tickets = TicketStorage::new(db)?;

        Ok(Self {
            config,
            menus,
            tickets,
            jwt_service,
            credentials: Arc::new(credentials),
        })
    }

    /// 初始化服务器状态
    ///
    /// 1. 打开 `WORK_DIR` 下的 redb 文件
    /// 2. 加载 JWT 配置 (生产环境必须提供密钥)
    /// 3. 加载编辑端账号
    pub fn initialize(config: &Config) -> Result<Self> {
        let db = crate::db::open(config.database_path())?;
        let jwt = JwtConfig::from_env(config.is_production())?;

        let credentials = AdminCredentials::new(
            config.admin_username.clone(),
            config.admin_password_hash.clone(),
        );
        if !credentials.is_configured() {
            tracing::warn!("ADMIN_PASSWORD_HASH not set, editor login is disabled");
        }

        Self::new(
            config.clone(),
            db,
            Arc::new(JwtService::with_config(jwt)),
            credentials,
        )
    }

    /// 内存数据库上的状态 (测试用)
    pub fn in_memory(config: Config, jwt: JwtConfig, credentials: AdminCredentials) -> Result<Self> {
        let db = crate::db::open_in_memory()?;
        Self::new(config, db, Arc::new(JwtService::with_config(jwt)), credentials)
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
